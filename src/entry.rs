//! Chain Entry Type
//!
//! An [`Entry`] is one `(key, value)` node of a bucket's chain. Nodes own
//! their successor through `next`, so a chain is a singly linked list of boxes
//! anchored at the bucket. Moving a node out of its predecessor's `next` is
//! the only way to unlink it, which makes the unlinking thread the node's sole
//! owner.
//!
//! # Memory Layout
//!
//! - `key: i32` - 4 bytes
//! - `value: i32` - 4 bytes
//! - `next: Option<Box<Entry>>` - 8 bytes (null-pointer optimized)
//!
//! Each entry is a single 16-byte heap allocation.

use std::fmt;

/// A node in a bucket chain.
///
/// # Examples
///
/// ```
/// use bucket_map::chain::Chain;
///
/// let mut chain = Chain::new();
/// chain.upsert(4, 20);
/// chain.upsert(0, 10);
///
/// let head = chain.iter().next().unwrap();
/// assert_eq!(head.key, 0);
/// assert_eq!(head.next().map(|e| e.value), Some(20));
/// ```
pub struct Entry {
    /// The key, unique within its chain
    pub key: i32,

    /// The value currently associated with `key`
    pub value: i32,

    /// Next node in the chain, owned by this one
    pub(crate) next: Option<Box<Entry>>,
}

impl Entry {
    /// Allocates a new node linked in front of `next`.
    ///
    /// Only a [`Chain`](crate::chain::Chain) owns links; it releases them
    /// iteratively.
    #[inline]
    #[allow(clippy::unnecessary_box_returns)]
    pub(crate) fn new(key: i32, value: i32, next: Option<Box<Entry>>) -> Box<Self> {
        Box::new(Self { key, value, next })
    }

    /// Returns the successor node, if any.
    #[inline]
    pub fn next(&self) -> Option<&Entry> {
        self.next.as_deref()
    }

    /// Returns the `(key, value)` pair held by this node.
    #[inline]
    pub fn pair(&self) -> (i32, i32) {
        (self.key, self.value)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Successors are left out so a long chain doesn't print recursively.
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("has_next", &self.next.is_some())
            .finish()
    }
}

/// Renders the node as `(key,value)`, the form used by chain dumps.
impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.key, self.value)
    }
}
