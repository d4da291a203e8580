//! Transaction lock
//!
//! Only one command batch may be on the wire at a time. The lock owns the
//! resource it protects (the connection), so holding a [`TransactionGuard`]
//! is the only way to reach it. The guard releases the lock when dropped,
//! which happens exactly once on every exit path.

use std::ops::{Deref, DerefMut};
use tokio::sync::{Mutex, MutexGuard};

/// Binary mutual exclusion around one transaction at a time
#[derive(Debug)]
pub struct TransactionLock<T> {
    inner: Mutex<T>,
}

impl<T> TransactionLock<T> {
    pub fn new(resource: T) -> Self {
        Self {
            inner: Mutex::new(resource),
        }
    }

    /// Wait until no other transaction is in flight
    pub async fn acquire(&self) -> TransactionGuard<'_, T> {
        TransactionGuard {
            guard: self.inner.lock().await,
        }
    }

    /// Whether no transaction currently holds the lock
    pub fn is_idle(&self) -> bool {
        self.inner.try_lock().is_ok()
    }
}

/// Held lock; releases on drop
#[derive(Debug)]
pub struct TransactionGuard<'a, T> {
    guard: MutexGuard<'a, T>,
}

impl<T> Deref for TransactionGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<T> DerefMut for TransactionGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_release_on_drop() {
        let lock = TransactionLock::new(0u32);
        {
            let mut guard = lock.acquire().await;
            *guard += 1;
            assert!(!lock.is_idle());
        }
        assert!(lock.is_idle());
        assert_eq!(*lock.acquire().await, 1);
    }

    #[tokio::test]
    async fn test_release_on_early_return() {
        async fn run(lock: &TransactionLock<()>, fail: bool) -> Result<(), &'static str> {
            let _guard = lock.acquire().await;
            if fail {
                return Err("fault");
            }
            Ok(())
        }

        let lock = TransactionLock::new(());
        assert!(run(&lock, true).await.is_err());
        assert!(lock.is_idle());
        assert!(run(&lock, false).await.is_ok());
        assert!(lock.is_idle());
    }

    #[tokio::test]
    async fn test_mutual_exclusion() {
        let lock = Arc::new(TransactionLock::new(()));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let lock = lock.clone();
                let in_flight = in_flight.clone();
                let max_in_flight = max_in_flight.clone();
                tokio::spawn(async move {
                    let _guard = lock.acquire().await;
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_in_flight.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
        assert!(lock.is_idle());
    }
}
