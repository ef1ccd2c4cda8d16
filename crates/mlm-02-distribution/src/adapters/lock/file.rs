//! # File Lock Implementation
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on
//! Windows). The holder's PID is written into the lock file for diagnostics
//! only. The OS drops the lock when its holder dies, so the file itself is
//! never unlinked: a new inode would let two processes lock "the" file.

use super::Backoff;
use crate::domain::errors::LockError;
use crate::ports::outbound::{CycleLock, ExclusiveCycleGuard};
use async_trait::async_trait;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Exclusive lock on a data directory's distribution cycle.
#[derive(Clone, Debug)]
pub struct FileCycleLock {
    path: PathBuf,
    timeout: Duration,
}

impl FileCycleLock {
    /// Lock file name
    const LOCK_FILE: &'static str = "cycle.lock";

    pub fn new(data_dir: &Path, timeout: Duration) -> Self {
        Self {
            path: data_dir.join(Self::LOCK_FILE),
            timeout,
        }
    }

    /// Path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> LockError {
        LockError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// One non-blocking attempt. `Ok(None)` means somebody else holds it.
    fn try_acquire(&self) -> Result<Option<HeldFileLock>, LockError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // No truncate here: the current holder's PID must stay readable
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        if file.try_lock_exclusive().is_err() {
            return Ok(None);
        }

        let pid = std::process::id();
        let mut locked = file;
        locked.set_len(0).map_err(|e| self.io_error(e))?;
        writeln!(locked, "{}", pid).map_err(|e| self.io_error(e))?;
        locked.sync_all().map_err(|e| self.io_error(e))?;

        Ok(Some(HeldFileLock {
            file: locked,
            path: self.path.clone(),
        }))
    }

    /// Read PID from an existing lock file
    fn holder_pid(&self) -> Option<u32> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

#[async_trait]
impl CycleLock for FileCycleLock {
    async fn acquire(&self) -> Result<ExclusiveCycleGuard, LockError> {
        let deadline = Instant::now() + self.timeout;
        let mut backoff = Backoff::new();

        loop {
            if let Some(held) = self.try_acquire()? {
                debug!(path = %self.path.display(), "[mlm-02] Cycle lock acquired");
                return Ok(ExclusiveCycleGuard::new(held));
            }

            if Instant::now() >= deadline {
                return Err(LockError::AlreadyLocked {
                    holder: self.holder_pid(),
                });
            }

            tokio::time::sleep(backoff.next_delay()).await;
        }
    }
}

/// Open, locked file. Unlocks on drop.
struct HeldFileLock {
    file: File,
    path: PathBuf,
}

impl Drop for HeldFileLock {
    fn drop(&mut self) {
        let _ = self.file.set_len(0);
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(path = %self.path.display(), error = %e, "[mlm-02] Failed to unlock cycle lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lock(dir: &Path, timeout_ms: u64) -> FileCycleLock {
        FileCycleLock::new(dir, Duration::from_millis(timeout_ms))
    }

    #[tokio::test]
    async fn test_lock_contains_pid() {
        let dir = tempfile::tempdir().unwrap();
        let lock = lock(dir.path(), 100);

        let _guard = lock.acquire().await.unwrap();
        let content = std::fs::read_to_string(lock.path()).unwrap();
        assert_eq!(content.trim().parse::<u32>().unwrap(), std::process::id());
    }

    #[tokio::test]
    async fn test_double_lock_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let first = lock(dir.path(), 100);
        let second = lock(dir.path(), 200);

        let _guard = first.acquire().await.unwrap();
        let result = second.acquire().await;
        assert!(matches!(
            result,
            Err(LockError::AlreadyLocked { holder: Some(pid) }) if pid == std::process::id()
        ));
    }

    #[tokio::test]
    async fn test_lock_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let lock = lock(dir.path(), 100);

        {
            let _guard = lock.acquire().await.unwrap();
        }

        let again = lock.acquire().await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_waiter_gets_lock_after_release() {
        let dir = tempfile::tempdir().unwrap();
        let holder = lock(dir.path(), 100);
        let waiter = lock(dir.path(), 2_000);

        let guard = holder.acquire().await.unwrap();
        let release = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            drop(guard);
        });

        assert!(waiter.acquire().await.is_ok());
        release.await.unwrap();
    }

    #[tokio::test]
    async fn test_dead_pid_in_held_lock_file_is_not_reclaimed() {
        let dir = tempfile::tempdir().unwrap();
        let holder = lock(dir.path(), 100);
        let waiter = lock(dir.path(), 200);

        let _guard = holder.acquire().await.unwrap();
        // Looks like a crashed holder, but the flock is still held
        std::fs::write(holder.path(), "4000000000\n").unwrap();

        let result = waiter.acquire().await;
        assert!(matches!(
            result,
            Err(LockError::AlreadyLocked { holder: Some(4_000_000_000) })
        ));
        assert!(holder.path().exists());
    }

    #[tokio::test]
    async fn test_leftover_pid_file_does_not_block() {
        let dir = tempfile::tempdir().unwrap();
        let lock = lock(dir.path(), 100);
        std::fs::write(lock.path(), "4000000000\n").unwrap();

        let _guard = lock.acquire().await.unwrap();
        let content = std::fs::read_to_string(lock.path()).unwrap();
        assert_eq!(content.trim().parse::<u32>().unwrap(), std::process::id());
    }
}
