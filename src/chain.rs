//! Singly linked chain of entries owned by one bucket.
//!
//! A [`Chain`] holds the head link of a bucket and owns every node reachable
//! from it. It has no synchronization of its own: callers reach it only
//! through the bucket lock (see [`Bucket`](crate::bucket::Bucket)), which is
//! what keeps the search-then-insert in [`Chain::upsert`] atomic with respect
//! to other writers of the same bucket.
//!
//! New keys are linked at the head, so iteration yields the most recently
//! inserted key first. Replacing the value of an existing key keeps its
//! position.

use crate::entry::Entry;
use std::fmt;
use std::mem;

/// An owned, singly linked chain of [`Entry`] nodes with unique keys.
#[derive(Default)]
pub struct Chain {
    head: Option<Box<Entry>>,
}

impl Chain {
    /// Creates an empty chain.
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// Returns `true` if the chain holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the number of entries. O(n).
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: i32) -> Option<i32> {
        self.iter().find(|entry| entry.key == key).map(|entry| entry.value)
    }

    /// Stores `value` under `key`.
    ///
    /// Replaces the value in place and returns the previous one when the key
    /// is already linked; otherwise links a new node at the head and returns
    /// `None`.
    pub fn upsert(&mut self, key: i32, value: i32) -> Option<i32> {
        let mut node = self.head.as_deref_mut();
        while let Some(entry) = node {
            if entry.key == key {
                return Some(mem::replace(&mut entry.value, value));
            }
            node = entry.next.as_deref_mut();
        }

        self.head = Some(Entry::new(key, value, self.head.take()));
        None
    }

    /// Unlinks the node holding `key` and hands it back to the caller.
    ///
    /// The predecessor (or the head) is relinked to the removed node's
    /// successor, and the returned node no longer links anywhere.
    pub fn remove(&mut self, key: i32) -> Option<Box<Entry>> {
        let mut link = &mut self.head;
        while link.as_ref().is_some_and(|entry| entry.key != key) {
            link = &mut link.as_mut()?.next;
        }

        let mut removed = link.take()?;
        *link = removed.next.take();
        Some(removed)
    }

    /// Releases every node, returning how many were released.
    ///
    /// Nodes are unlinked one at a time so that dropping a long chain does not
    /// recurse through the `next` links.
    pub fn clear(&mut self) -> usize {
        let mut released = 0;
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
            released += 1;
        }
        released
    }

    /// Returns an iterator over the entries in chain order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Entry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders the chain as `(k,v) -> (k,v) -> ...`.
impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(Entry::pair))
            .finish()
    }
}

/// Iterator over the entries of a [`Chain`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    next: Option<&'a Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.next?;
        self.next = entry.next();
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(chain: &Chain) -> Vec<(i32, i32)> {
        chain.iter().map(Entry::pair).collect()
    }

    #[test]
    fn test_upsert_links_at_head() {
        let mut chain = Chain::new();
        assert!(chain.is_empty());

        assert_eq!(chain.upsert(1, 10), None);
        assert_eq!(chain.upsert(2, 20), None);
        assert_eq!(chain.upsert(3, 30), None);

        assert_eq!(pairs(&chain), vec![(3, 30), (2, 20), (1, 10)]);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut chain = Chain::new();
        chain.upsert(1, 10);
        chain.upsert(2, 20);

        assert_eq!(chain.upsert(1, 11), Some(10));
        assert_eq!(pairs(&chain), vec![(2, 20), (1, 11)]);
        assert_eq!(chain.get(1), Some(11));
    }

    #[test]
    fn test_get_missing() {
        let mut chain = Chain::new();
        assert_eq!(chain.get(0), None);
        chain.upsert(0, i32::MAX);
        assert_eq!(chain.get(0), Some(i32::MAX));
        assert_eq!(chain.get(1), None);
    }

    #[test]
    fn test_remove_head_middle_tail() {
        let mut chain = Chain::new();
        for key in 0..5 {
            chain.upsert(key, key * 10);
        }
        // chain order: 4, 3, 2, 1, 0

        let head = chain.remove(4).unwrap();
        assert_eq!(head.pair(), (4, 40));
        assert!(head.next().is_none());
        assert_eq!(pairs(&chain), vec![(3, 30), (2, 20), (1, 10), (0, 0)]);

        assert_eq!(chain.remove(2).map(|e| e.value), Some(20));
        assert_eq!(pairs(&chain), vec![(3, 30), (1, 10), (0, 0)]);

        assert_eq!(chain.remove(0).map(|e| e.value), Some(0));
        assert_eq!(pairs(&chain), vec![(3, 30), (1, 10)]);
    }

    #[test]
    fn test_remove_missing() {
        let mut chain = Chain::new();
        assert!(chain.remove(1).is_none());

        chain.upsert(1, 10);
        assert!(chain.remove(2).is_none());
        assert_eq!(pairs(&chain), vec![(1, 10)]);
    }

    #[test]
    fn test_clear_counts_released() {
        let mut chain = Chain::new();
        for key in 0..4 {
            chain.upsert(key, key);
        }
        assert_eq!(chain.clear(), 4);
        assert!(chain.is_empty());
        assert_eq!(chain.clear(), 0);
    }

    #[test]
    fn test_long_chain_drop() {
        let mut chain = Chain::new();
        for key in 0..200_000 {
            chain.upsert_front_unchecked(key);
        }
        assert_eq!(chain.len(), 200_000);
        drop(chain);
    }

    #[test]
    fn test_display() {
        let mut chain = Chain::new();
        assert_eq!(chain.to_string(), "");
        chain.upsert(0, 10);
        chain.upsert(4, 20);
        assert_eq!(chain.to_string(), "(4,20) -> (0,10)");
    }

    impl Chain {
        // Skips the duplicate scan so building a huge chain stays linear.
        fn upsert_front_unchecked(&mut self, key: i32) {
            self.head = Some(Entry::new(key, key, self.head.take()));
        }
    }
}
