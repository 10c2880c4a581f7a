//! Concurrent Bucket Map Implementation
//!
//! A fixed-capacity `i32 → i32` map whose buckets are locked independently.
//! This is the only component of the crate; everything else supports it.
//!
//! # How It Works
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                             BucketMap                                │
//! │                                                                      │
//! │  (key as u32) % capacity  ──▶  Bucket Selection                      │
//! │                                                                      │
//! │  ┌──────────────┐ ┌──────────────┐     ┌──────────────┐              │
//! │  │   Bucket 0   │ │   Bucket 1   │ ... │ Bucket cap-1 │              │
//! │  │   [Mutex]    │ │   [Mutex]    │     │   [Mutex]    │              │
//! │  │   (k,v)─▶…   │ │   (k,v)─▶…   │     │      ∅       │              │
//! │  └──────────────┘ └──────────────┘     └──────────────┘              │
//! │                                                                      │
//! │  ┌──────────────────┐  ┌──────────────────┐                          │
//! │  │ size   [Mutex]   │  │ ops    [Mutex]   │   counter lock domain    │
//! │  └──────────────────┘  └──────────────────┘                          │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation follows the same sequence:
//!
//! 1. Count the operation under the ops lock.
//! 2. Lock the key's bucket, search or mutate its chain, unlock.
//! 3. For an insert or a removal, adjust `size` under the size lock.
//!
//! A thread never holds a bucket lock and a counter lock at the same time, and
//! never holds two bucket locks outside of [`BucketMap::snapshot`]. Operations
//! on different buckets share no lock besides the brief counter sections.
//!
//! # Fixed Capacity
//!
//! The bucket count is chosen at construction and never changes. There is no
//! rehashing; chains simply grow as the load factor rises.
//!
//! # Thread Safety
//!
//! `BucketMap` is `Send + Sync`. Share it by reference with scoped threads or
//! wrap it in `Arc`.
//!
//! # Example
//!
//! ```rust
//! use bucket_map::BucketMap;
//! use std::thread;
//!
//! let map = BucketMap::new(16).unwrap();
//!
//! thread::scope(|s| {
//!     for t in 0..4 {
//!         let map = &map;
//!         s.spawn(move || {
//!             for i in 0..100 {
//!                 map.put(t * 100 + i, i);
//!             }
//!         });
//!     }
//! });
//!
//! assert_eq!(map.len(), 400);
//! assert_eq!(map.ops_count(), 400);
//! assert_eq!(map.destroy(), 400);
//! ```

use crate::bucket::Bucket;
use crate::config::BucketMapConfig;
use crate::counter::Counter;
use crate::error::{MapError, Result};
use crate::snapshot::Snapshot;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Returns the bucket that `key` belongs to in a map of `capacity` buckets.
///
/// The key is reinterpreted as unsigned before the modulo, so negative keys
/// land in `[0, capacity)` like any other.
///
/// # Panics
///
/// Panics if `capacity` is zero.
///
/// # Examples
///
/// ```
/// use bucket_map::bucket_index;
///
/// assert_eq!(bucket_index(0, 4), 0);
/// assert_eq!(bucket_index(4, 4), 0);
/// assert_eq!(bucket_index(7, 4), 3);
/// assert_eq!(bucket_index(-1, 4), 3); // 0xFFFF_FFFF % 4
/// ```
#[inline]
pub fn bucket_index(key: i32, capacity: usize) -> usize {
    (key as u32 as usize) % capacity
}

/// A thread-safe map from `i32` keys to `i32` values with per-bucket locking.
///
/// Lookups, inserts and removals lock only the bucket the key hashes to. The
/// live entry count and the operation count are kept in two counters, each
/// with its own lock.
///
/// # Example
///
/// ```rust
/// use bucket_map::BucketMap;
///
/// let map = BucketMap::new(4).unwrap();
///
/// assert_eq!(map.put(0, 10), None);
/// assert_eq!(map.put(4, 20), None); // same bucket as key 0
/// assert_eq!(map.put(0, 11), Some(10));
/// assert_eq!(map.get(4), Some(20));
/// assert_eq!(map.delete(0), Some(11));
/// assert_eq!(map.get(0), None);
///
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.ops_count(), 6);
/// ```
pub struct BucketMap {
    buckets: Box<[Bucket]>,
    size: Counter,
    ops: Counter,
}

impl BucketMap {
    /// Creates a map with `capacity` buckets.
    ///
    /// # Errors
    ///
    /// - [`MapError::InvalidArgument`] if `capacity <= 0`
    /// - [`MapError::ResourceExhausted`] if the bucket array cannot be allocated
    ///
    /// # Example
    ///
    /// ```rust
    /// use bucket_map::{BucketMap, MapError};
    ///
    /// let map = BucketMap::new(8).unwrap();
    /// assert_eq!(map.capacity(), 8);
    ///
    /// assert_eq!(
    ///     BucketMap::new(0).unwrap_err(),
    ///     MapError::InvalidArgument { capacity: 0 }
    /// );
    /// ```
    pub fn new(capacity: i64) -> Result<Self> {
        Self::init(BucketMapConfig::try_from(capacity)?)
    }

    /// Creates a map from a configuration.
    ///
    /// All buckets and their locks are allocated up front.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::ResourceExhausted`] if the bucket array cannot be
    /// allocated.
    pub fn init(config: BucketMapConfig) -> Result<Self> {
        let capacity = config.capacity.get();

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(capacity)
            .map_err(|_| MapError::ResourceExhausted { buckets: capacity })?;
        buckets.extend((0..capacity).map(|_| Bucket::new()));

        debug!(capacity, "bucket map initialized");

        Ok(Self {
            buckets: buckets.into_boxed_slice(),
            size: Counter::new(),
            ops: Counter::new(),
        })
    }

    /// Returns the number of buckets. Fixed for the lifetime of the map.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the bucket index `key` hashes to in this map.
    #[inline]
    pub fn bucket_index(&self, key: i32) -> usize {
        bucket_index(key, self.capacity())
    }

    #[inline]
    fn bucket(&self, key: i32) -> &Bucket {
        &self.buckets[self.bucket_index(key)]
    }

    /// Returns the number of live entries, read under the size lock.
    ///
    /// Exact only when no `put` or `delete` is in flight. A delete that
    /// overtakes the count of the insert it undoes can leave the counter
    /// briefly negative; that reads as zero.
    pub fn len(&self) -> usize {
        self.size.get_clamped()
    }

    /// Returns `true` if the size counter reads zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of `get`, `put` and `delete` calls issued so far.
    pub fn ops_count(&self) -> usize {
        self.ops.get_clamped()
    }

    /// Returns the value stored under `key`, or `None` if the key is absent.
    ///
    /// Counts as one operation whatever the outcome.
    pub fn get(&self, key: i32) -> Option<i32> {
        self.ops.increment();
        self.bucket(key).get(key)
    }

    /// Stores `value` under `key`.
    ///
    /// # Returns
    ///
    /// - `Some(previous)` if the key was present; its value is replaced in
    ///   place and the size is unchanged
    /// - `None` if the key was new; the entry is linked at the head of its
    ///   chain and the size grows by one
    pub fn put(&self, key: i32, value: i32) -> Option<i32> {
        self.ops.increment();
        let previous = self.bucket(key).upsert(key, value);
        if previous.is_none() {
            self.size.increment();
        }
        previous
    }

    /// Removes `key` from the map.
    ///
    /// # Returns
    ///
    /// - `Some(value)` with the removed value if the key was present
    /// - `None` if it was absent, in which case nothing else changes
    pub fn delete(&self, key: i32) -> Option<i32> {
        self.ops.increment();
        let removed = self.bucket(key).remove(key)?;
        self.size.decrement();
        Some(removed.value)
    }

    /// Locks every bucket in index order and returns a consistent view.
    ///
    /// Other threads block on any bucket operation until the snapshot is
    /// dropped. The calling thread must not operate on this map while it holds
    /// the snapshot.
    pub fn snapshot(&self) -> Snapshot<'_> {
        let guards = self.buckets.iter().map(Bucket::lock).collect();
        trace!(capacity = self.capacity(), "acquired all bucket locks");
        Snapshot::from_guards(guards)
    }

    /// Renders every chain, one `[index] -> (k,v) -> ...` line per bucket.
    ///
    /// Taken from a [`snapshot`](Self::snapshot), so the text is a consistent
    /// view even while other threads are mutating the map.
    pub fn dump(&self) -> String {
        self.snapshot().to_string()
    }

    /// Tears the map down and returns how many entries were released.
    ///
    /// Releases every chain's entries and bucket lock, then the counter
    /// locks, then the bucket array. Taking `self` by value means no thread
    /// can still be operating on the map.
    pub fn destroy(self) -> usize {
        let Self { buckets, size, ops } = self;
        let capacity = buckets.len();

        let mut buckets = buckets.into_vec();
        let released: usize = buckets
            .drain(..)
            .map(|bucket| bucket.into_chain().clear())
            .sum();

        let size = size.into_inner();
        let ops = ops.into_inner();
        debug_assert_eq!(
            usize::try_from(size).ok(),
            Some(released),
            "size counter out of sync with chains"
        );
        drop(buckets);

        debug!(capacity, entries = released, ops, "bucket map torn down");
        released
    }

    /// Tears down a shared map if `this` is the last handle to it.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::PreconditionViolation`] if other handles are still
    /// alive. The caller's handle is dropped either way; the map itself is
    /// then released when the last remaining handle goes away.
    ///
    /// `other_handles` is read after the unwrap failed and is approximate,
    /// since other handles may be cloned or dropped meanwhile. It never
    /// reports fewer than 1.
    pub fn try_destroy(this: Arc<Self>) -> Result<usize> {
        match Arc::try_unwrap(this) {
            Ok(map) => Ok(map.destroy()),
            Err(shared) => {
                let other_handles = Arc::strong_count(&shared).saturating_sub(1).max(1);
                warn!(other_handles, "teardown refused while map is shared");
                Err(MapError::PreconditionViolation { other_handles })
            }
        }
    }
}

impl fmt::Debug for BucketMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketMap")
            .field("capacity", &self.capacity())
            .field("size", &self.len())
            .field("ops_count", &self.ops_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::num::NonZeroUsize;
    use std::sync::mpsc::{self, RecvTimeoutError};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_basic_operations() {
        let map = BucketMap::new(8).unwrap();
        assert!(map.is_empty());

        assert_eq!(map.put(1, 10), None);
        assert_eq!(map.put(2, 20), None);
        assert_eq!(map.len(), 2);

        assert_eq!(map.get(1), Some(10));
        assert_eq!(map.get(3), None);

        assert_eq!(map.put(1, 11), Some(10));
        assert_eq!(map.len(), 2);

        assert_eq!(map.delete(1), Some(11));
        assert_eq!(map.delete(1), None);
        assert_eq!(map.len(), 1);
        assert_eq!(map.ops_count(), 7);
    }

    #[test]
    fn test_invalid_capacity() {
        assert_eq!(
            BucketMap::new(0).unwrap_err(),
            MapError::InvalidArgument { capacity: 0 }
        );
        assert_eq!(
            BucketMap::new(-5).unwrap_err(),
            MapError::InvalidArgument { capacity: -5 }
        );
    }

    #[test]
    fn test_unallocatable_capacity() {
        let config = BucketMapConfig::new(NonZeroUsize::MAX);
        assert_eq!(
            BucketMap::init(config).unwrap_err(),
            MapError::ResourceExhausted {
                buckets: usize::MAX
            }
        );
    }

    #[test]
    fn test_single_bucket() {
        let map = BucketMap::new(1).unwrap();
        for key in [-3, 0, 7, i32::MIN, i32::MAX] {
            assert_eq!(map.bucket_index(key), 0);
            map.put(key, key);
        }
        assert_eq!(map.len(), 5);
        assert_eq!(map.snapshot().chain_len(0), Some(5));
        assert_eq!(map.get(i32::MIN), Some(i32::MIN));
    }

    #[test]
    fn test_negative_keys_hash_unsigned() {
        let map = BucketMap::new(10).unwrap();
        // 0xFFFF_FFFF = 4294967295
        assert_eq!(map.bucket_index(-1), 5);
        // 0x8000_0000 = 2147483648
        assert_eq!(map.bucket_index(i32::MIN), 8);

        map.put(-1, 1);
        assert_eq!(map.snapshot().chain_len(5), Some(1));
    }

    #[test]
    fn test_max_value_is_storable() {
        let map = BucketMap::new(4).unwrap();
        assert_eq!(map.put(1, i32::MAX), None);
        assert_eq!(map.get(1), Some(i32::MAX));
        assert_eq!(map.delete(1), Some(i32::MAX));
    }

    #[test]
    fn test_destroy_reports_released_entries() {
        let map = BucketMap::new(4).unwrap();
        for key in 0..10 {
            map.put(key, key);
        }
        map.delete(3);
        assert_eq!(map.destroy(), 9);
    }

    #[test]
    fn test_try_destroy() {
        let map = Arc::new(BucketMap::new(4).unwrap());
        map.put(1, 1);

        let other = Arc::clone(&map);
        assert_eq!(
            BucketMap::try_destroy(map).unwrap_err(),
            MapError::PreconditionViolation { other_handles: 1 }
        );

        assert_eq!(other.get(1), Some(1));
        assert_eq!(BucketMap::try_destroy(other), Ok(1));
    }

    #[test]
    fn test_dump() {
        let map = BucketMap::new(2).unwrap();
        map.put(1, 100);
        assert_eq!(map.dump(), "[0] -> \n[1] -> (1,100)\n");
    }

    #[test]
    fn test_debug() {
        let map = BucketMap::new(2).unwrap();
        map.put(1, 100);
        assert_eq!(
            format!("{map:?}"),
            "BucketMap { capacity: 2, size: 1, ops_count: 1 }"
        );
    }

    #[test]
    fn test_concurrent_access() {
        let map = BucketMap::new(16).unwrap();

        thread::scope(|s| {
            for t in 0..8 {
                let map = &map;
                s.spawn(move || {
                    for i in 0..1000 {
                        let key = t * 1000 + i;
                        assert_eq!(map.put(key, i), None);
                        assert_eq!(map.get(key), Some(i));
                    }
                });
            }
        });

        assert_eq!(map.len(), 8000);
        assert_eq!(map.ops_count(), 16_000);
    }

    #[test]
    fn test_snapshot_releases_locks_on_drop() {
        let map = BucketMap::new(4).unwrap();
        map.put(0, 0);
        {
            let snapshot = map.snapshot();
            assert_eq!(snapshot.entry_count(), 1);
        }
        // locks released with the snapshot
        assert_eq!(map.put(4, 4), None);
    }

    #[test]
    fn test_delete_counted_before_insert() {
        let map = BucketMap::new(4).unwrap();

        // put(7, 1) has linked its entry but not yet counted it
        map.ops.increment();
        assert_eq!(map.bucket(7).upsert(7, 1), None);

        // a delete of the same key unlinks and counts first
        assert_eq!(map.delete(7), Some(1));
        assert_eq!(map.size.get(), -1);
        assert_eq!(map.len(), 0);

        // the insert is counted last
        map.size.increment();
        assert_eq!(map.len(), 0);
        assert_eq!(map.len(), map.snapshot().entry_count());
        assert_eq!(map.ops_count(), 2);

        assert_eq!(map.put(7, 2), None);
        assert_eq!(map.len(), 1);
        assert_eq!(map.destroy(), 1);
    }

    #[test]
    fn test_other_buckets_progress_while_one_is_locked() {
        let map = BucketMap::new(4).unwrap();
        let guard = map.buckets[0].lock();

        thread::scope(|s| {
            let (tx, rx) = mpsc::channel();
            let map = &map;

            let other_bucket = tx.clone();
            s.spawn(move || other_bucket.send(map.put(1, 10)).unwrap());
            assert_eq!(rx.recv_timeout(Duration::from_secs(10)), Ok(None));

            // 4 % 4 == 0, the locked bucket
            s.spawn(move || tx.send(map.put(4, 40)).unwrap());
            assert_eq!(
                rx.recv_timeout(Duration::from_millis(200)),
                Err(RecvTimeoutError::Timeout)
            );

            drop(guard);
            assert_eq!(rx.recv_timeout(Duration::from_secs(10)), Ok(None));
        });

        assert_eq!(map.get(1), Some(10));
        assert_eq!(map.get(4), Some(40));
        assert_eq!(map.len(), 2);
    }
}
