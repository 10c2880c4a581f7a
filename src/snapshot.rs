//! Consistent, fully locked views of a bucket map.
//!
//! A [`Snapshot`] holds the lock of every bucket for as long as it lives.
//! Locks are taken in ascending bucket index order; mutators hold at most one
//! bucket lock at a time, so a snapshot can be taken while other threads are
//! running `get`/`put`/`delete` without risking a lock-ordering cycle. Those
//! threads simply wait until the snapshot is dropped.
//!
//! The dump format rendered by `Display` is one line per bucket:
//!
//! ```text
//! [0] -> (4,20) -> (0,10)
//! [1] -> (5,2)
//! [2] ->
//! [3] ->
//! ```
//!
//! # Deadlock
//!
//! Bucket locks are not reentrant. The thread holding a snapshot must not call
//! `get`, `put` or `delete` on the same map before dropping it.

use crate::chain::Chain;
use crate::entry::Entry;
use parking_lot::MutexGuard;
use std::collections::BTreeSet;
use std::fmt;

/// A point-in-time view of every chain, with all bucket locks held.
pub struct Snapshot<'a> {
    chains: Vec<MutexGuard<'a, Chain>>,
}

impl<'a> Snapshot<'a> {
    /// Builds a snapshot from guards already acquired in bucket index order.
    pub(crate) fn from_guards(chains: Vec<MutexGuard<'a, Chain>>) -> Self {
        Self { chains }
    }

    /// Returns the number of buckets covered by the snapshot.
    pub fn capacity(&self) -> usize {
        self.chains.len()
    }

    /// Returns the chain of bucket `index`, or `None` if out of range.
    pub fn chain(&self, index: usize) -> Option<&Chain> {
        self.chains.get(index).map(|guard| &**guard)
    }

    /// Returns the chains in bucket index order.
    pub fn chains(&self) -> impl Iterator<Item = &Chain> + '_ {
        self.chains.iter().map(|guard| &**guard)
    }

    /// Returns every `(bucket, entry)` pair in bucket order, chain order within.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Entry)> + '_ {
        self.chains()
            .enumerate()
            .flat_map(|(index, chain)| chain.iter().map(move |entry| (index, entry)))
    }

    /// Returns the length of bucket `index`'s chain, or `None` if out of range.
    pub fn chain_len(&self, index: usize) -> Option<usize> {
        self.chain(index).map(Chain::len)
    }

    /// Returns the total number of entries across all buckets.
    pub fn entry_count(&self) -> usize {
        self.chains().map(Chain::len).sum()
    }

    /// Returns the number of buckets with an empty chain.
    pub fn empty_buckets(&self) -> usize {
        self.chains().filter(|chain| chain.is_empty()).count()
    }

    /// Returns the length of the longest chain.
    pub fn longest_chain(&self) -> usize {
        self.chains().map(Chain::len).max().unwrap_or(0)
    }

    /// Returns `true` if no chain links the same key twice.
    pub fn has_unique_keys(&self) -> bool {
        self.chains().all(|chain| {
            let mut seen = BTreeSet::new();
            chain.iter().all(|entry| seen.insert(entry.key))
        })
    }

    /// Returns `true` if every key sits in the bucket its hash selects.
    pub fn keys_in_home_buckets(&self) -> bool {
        let capacity = self.capacity();
        self.entries()
            .all(|(index, entry)| crate::map::bucket_index(entry.key, capacity) == index)
    }
}

impl fmt::Display for Snapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.chains().enumerate() {
            writeln!(f, "[{index}] -> {chain}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Snapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("capacity", &self.capacity())
            .field("entries", &self.entry_count())
            .finish()
    }
}
