//! Process-wide lock serialising every operation on the backing store.
//!
//! Saves rewrite three tables one after another and loads read them back the
//! same way, so a load interleaved with a save could observe a mix of old and
//! new tables. Every save and load therefore runs under one exclusive lock.
//! Acquisition is bounded: a caller that cannot get the lock in time fails
//! with [`LockTimeout`] instead of queueing forever.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Default bound on lock acquisition.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// The lock was not acquired within its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("store lock not acquired within {waited:?}")]
pub struct LockTimeout {
    /// How long the caller waited.
    pub waited: Duration,
}

/// Exclusive, timeout-bounded lock over the backing store.
///
/// Clones share the same underlying lock.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use state_backend::domain::lock::StoreLock;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let lock = StoreLock::new(Duration::from_millis(50));
/// let guard = lock.acquire().await.expect("free lock");
/// assert!(lock.acquire().await.is_err());
/// drop(guard);
/// assert!(lock.acquire().await.is_ok());
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct StoreLock {
    inner: Arc<Mutex<()>>,
    timeout: Duration,
}

impl Default for StoreLock {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}

impl StoreLock {
    /// Create a lock that waits at most `timeout` on acquisition.
    pub fn new(timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(())),
            timeout,
        }
    }

    /// Configured acquisition bound.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait for exclusive access.
    ///
    /// The returned guard releases the lock when dropped, including when the
    /// holder panics or its future is cancelled.
    ///
    /// # Errors
    /// Returns [`LockTimeout`] when the lock is still held after the bound.
    pub async fn acquire(&self) -> Result<StoreLockGuard, LockTimeout> {
        let guard = tokio::time::timeout(self.timeout, Arc::clone(&self.inner).lock_owned())
            .await
            .map_err(|_| LockTimeout {
                waited: self.timeout,
            })?;
        debug!("store lock acquired");
        Ok(StoreLockGuard { _guard: guard })
    }
}

/// Proof of exclusive access. Dropping it releases the lock.
#[derive(Debug)]
pub struct StoreLockGuard {
    _guard: OwnedMutexGuard<()>,
}
