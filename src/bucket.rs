//! Per-bucket lock management.
//!
//! Each [`Bucket`] pairs one [`Chain`] with the `parking_lot::Mutex` that
//! guards it. The lock is created with the bucket and never replaced. Every
//! chain operation goes through one of the methods below, each of which
//! holds the lock for exactly the span of the chain work and has released it
//! by the time it returns. Callers therefore never carry a bucket guard into
//! counter updates.
//!
//! ```text
//! ┌──────────── Bucket ────────────┐
//! │  Mutex ──▶ Chain               │
//! │             head ─▶ (k,v) ─▶ (k,v) ─▶ ∅
//! └────────────────────────────────┘
//! ```

use crate::chain::Chain;
use crate::entry::Entry;
use parking_lot::{Mutex, MutexGuard};
use tracing::trace;

/// One slot of the bucket array: a chain and its lock.
#[derive(Debug, Default)]
pub struct Bucket {
    chain: Mutex<Chain>,
}

impl Bucket {
    /// Creates an empty bucket with its own lock.
    pub fn new() -> Self {
        Self {
            chain: Mutex::new(Chain::new()),
        }
    }

    /// Looks up `key` with the bucket locked for the search.
    pub fn get(&self, key: i32) -> Option<i32> {
        self.chain.lock().get(key)
    }

    /// Inserts or replaces `key` with the bucket locked across both the
    /// search and the mutation.
    pub fn upsert(&self, key: i32, value: i32) -> Option<i32> {
        let previous = self.chain.lock().upsert(key, value);
        match previous {
            Some(old) => trace!(key, old, value, "replaced value in place"),
            None => trace!(key, value, "linked new entry at chain head"),
        }
        previous
    }

    /// Unlinks `key` with the bucket locked; the node is handed back after
    /// the lock is released.
    pub fn remove(&self, key: i32) -> Option<Box<Entry>> {
        let removed = self.chain.lock().remove(key);
        if let Some(entry) = &removed {
            trace!(key, value = entry.value, "unlinked entry");
        }
        removed
    }

    /// Acquires the bucket lock and returns the guard.
    ///
    /// Blocks until the lock is available. The lock is not reentrant: calling
    /// any other method of this bucket while holding the guard deadlocks.
    pub fn lock(&self) -> MutexGuard<'_, Chain> {
        self.chain.lock()
    }

    /// Consumes the bucket, releasing its lock and returning the chain.
    pub fn into_chain(self) -> Chain {
        self.chain.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_bucket_operations() {
        let bucket = Bucket::new();
        assert_eq!(bucket.get(1), None);
        assert_eq!(bucket.upsert(1, 10), None);
        assert_eq!(bucket.upsert(1, 11), Some(10));
        assert_eq!(bucket.get(1), Some(11));
        assert_eq!(bucket.remove(1).map(|e| e.value), Some(11));
        assert!(bucket.remove(1).is_none());
        assert!(bucket.lock().is_empty());
    }

    #[test]
    fn test_lock_released_after_each_operation() {
        let bucket = Bucket::new();
        bucket.upsert(1, 1);
        let _ = bucket.get(1);
        let _ = bucket.remove(1);
        assert!(bucket.chain.try_lock().is_some());
    }

    #[test]
    fn test_into_chain() {
        let bucket = Bucket::new();
        bucket.upsert(1, 10);
        bucket.upsert(2, 20);
        let mut chain = bucket.into_chain();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.clear(), 2);
    }

    #[test]
    fn test_concurrent_upserts_same_bucket() {
        let bucket = Arc::new(Bucket::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let bucket = Arc::clone(&bucket);
                thread::spawn(move || {
                    for i in 0..500 {
                        bucket.upsert(t * 1000 + i, i);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(bucket.lock().len(), 2000);
    }
}
