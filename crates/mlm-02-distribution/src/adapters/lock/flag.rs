//! In-process cycle lock for memory-only report stores.

use super::Backoff;
use crate::domain::errors::LockError;
use crate::ports::outbound::{CycleLock, ExclusiveCycleGuard};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// A flag shared by every clone; at most one guard exists at a time.
#[derive(Clone, Debug)]
pub struct InProcessCycleLock {
    held: Arc<AtomicBool>,
    timeout: Duration,
}

impl InProcessCycleLock {
    pub fn new(timeout: Duration) -> Self {
        Self {
            held: Arc::new(AtomicBool::new(false)),
            timeout,
        }
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}

impl Default for InProcessCycleLock {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl CycleLock for InProcessCycleLock {
    async fn acquire(&self) -> Result<ExclusiveCycleGuard, LockError> {
        let deadline = Instant::now() + self.timeout;
        let mut backoff = Backoff::new();

        loop {
            if self
                .held
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return Ok(ExclusiveCycleGuard::new(FlagRelease(self.held.clone())));
            }

            if Instant::now() >= deadline {
                return Err(LockError::AlreadyLocked {
                    holder: Some(std::process::id()),
                });
            }

            tokio::time::sleep(backoff.next_delay()).await;
        }
    }
}

struct FlagRelease(Arc<AtomicBool>);

impl Drop for FlagRelease {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
