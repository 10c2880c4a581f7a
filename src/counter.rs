//! Lock-protected counters.
//!
//! The map keeps two of these, one for the live entry count and one for the
//! operation count. Each carries its own `parking_lot::Mutex`, separate from
//! every bucket lock, and the critical sections are a single add, subtract
//! or read. A counter is only ever touched while no bucket lock is held by
//! the same thread, so the two lock domains never nest.
//!
//! The count is signed. A `put` counts its insert only after releasing the
//! bucket lock, so a `delete` of the same key on another thread may unlink
//! the entry and count the removal first. The size then reads one below the
//! true value until the insert lands, which can mean below zero.

use parking_lot::Mutex;

/// A signed counter whose every read and write goes through its own lock.
#[derive(Debug, Default)]
pub struct Counter {
    count: Mutex<isize>,
}

impl Counter {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self {
            count: Mutex::new(0),
        }
    }

    /// Adds one and returns the new count.
    #[inline]
    pub fn increment(&self) -> isize {
        let mut count = self.count.lock();
        *count += 1;
        *count
    }

    /// Subtracts one and returns the new count, which may be negative while
    /// the matching increment is still in flight.
    #[inline]
    pub fn decrement(&self) -> isize {
        let mut count = self.count.lock();
        *count -= 1;
        *count
    }

    /// Reads the current count under the lock.
    ///
    /// While other threads are mid-operation the value may already be stale
    /// when it is returned.
    #[inline]
    pub fn get(&self) -> isize {
        *self.count.lock()
    }

    /// Reads the count, reporting a transiently negative value as zero.
    #[inline]
    pub fn get_clamped(&self) -> usize {
        usize::try_from(self.get()).unwrap_or(0)
    }

    /// Consumes the counter, releasing its lock and returning the final count.
    pub fn into_inner(self) -> isize {
        self.count.into_inner()
    }
}
