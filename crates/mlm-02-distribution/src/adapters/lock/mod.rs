//! # Cycle Locking
//!
//! Serializes distribution cycles across invocations.
//!
//! ## Modules
//!
//! - `file`: `FileCycleLock`, an fs2 exclusive lock on `<data_dir>/cycle.lock`
//! - `flag`: `InProcessCycleLock`, for stores that live only in memory
//!
//! Both retry with exponential backoff (50 ms doubling, capped at 500 ms)
//! until their timeout expires.

mod file;
mod flag;

pub use file::FileCycleLock;
pub use flag::InProcessCycleLock;

use std::time::Duration;

const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(50);
const MAX_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Exponential backoff schedule for lock retries.
#[derive(Debug)]
pub(crate) struct Backoff {
    next: Duration,
}

impl Backoff {
    pub(crate) fn new() -> Self {
        Self {
            next: INITIAL_RETRY_DELAY,
        }
    }

    /// Current delay; the following one is doubled, up to the cap.
    pub(crate) fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (self.next * 2).min(MAX_RETRY_DELAY);
        delay
    }
}
