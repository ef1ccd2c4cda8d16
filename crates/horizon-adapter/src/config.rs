//! Configuration for the Horizon adapter

use serde::{Deserialize, Serialize};
use shared_types::envelope::PUBLIC_NETWORK_PASSPHRASE;

/// Public network Horizon.
pub const DEFAULT_HORIZON_URL: &str = "https://horizon.stellar.org";

/// Largest page Horizon serves.
pub const DEFAULT_PAGE_LIMIT: u32 = 200;

/// Horizon client configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HorizonConfig {
    pub base_url: String,
    /// Network the envelopes are signed for
    pub network_passphrase: String,
    /// Records per page when enumerating accounts
    pub page_limit: u32,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HORIZON_URL.to_string(),
            network_passphrase: PUBLIC_NETWORK_PASSPHRASE.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            request_timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}
