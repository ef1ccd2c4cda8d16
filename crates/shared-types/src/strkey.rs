//! # StrKey Codec
//!
//! Ledger keys are written as 56-character base32 strings carrying a version
//! byte, the 32-byte key and a CRC16 checksum. The codec itself is
//! `stellar-strkey`; this module pins the two key kinds the subsystems use
//! and maps failures into [`StrKeyError`].
//!
//! - `G...` ed25519 public keys (account ids)
//! - `S...` ed25519 secret seeds

use crate::errors::StrKeyError;
use stellar_strkey::ed25519::{PrivateKey, PublicKey};

/// Encoded length of a 32-byte key.
pub const ENCODED_LEN: usize = 56;

fn check_len(s: &str) -> Result<(), StrKeyError> {
    if s.len() != ENCODED_LEN {
        return Err(StrKeyError::InvalidLength(s.len()));
    }
    Ok(())
}

/// Decode a `G...` account id into its 32-byte public key.
pub fn decode_account_id(s: &str) -> Result<[u8; 32], StrKeyError> {
    check_len(s)?;
    PublicKey::from_string(s)
        .map(|key| key.0)
        .map_err(|_| StrKeyError::Invalid {
            expected: "account id",
        })
}

/// Decode an `S...` seed into its 32-byte ed25519 secret.
pub fn decode_seed(s: &str) -> Result<[u8; 32], StrKeyError> {
    check_len(s)?;
    PrivateKey::from_string(s)
        .map(|key| key.0)
        .map_err(|_| StrKeyError::Invalid { expected: "seed" })
}

pub fn encode_account_id(key: &[u8; 32]) -> String {
    PublicKey(*key).to_string()
}

pub fn encode_seed(key: &[u8; 32]) -> String {
    PrivateKey(*key).to_string()
}
