//! Bucket Map Configuration
//!
//! The configuration struct has public fields for simple instantiation. The
//! only knob is the bucket count: a [`BucketMap`](crate::BucketMap) never
//! resizes, so the capacity chosen here is the capacity for the map's whole
//! lifetime.
//!
//! # Sizing Guidelines
//!
//! Every key lands in bucket `(key as u32) % capacity`, and each bucket is a
//! chain searched linearly under its lock. Chain length is roughly
//! `entries / capacity`, so:
//!
//! ```text
//! expected chain length ≈ live entries / capacity
//! max parallelism       ≈ min(threads, capacity)
//! ```
//!
//! Pick a capacity near the expected number of live entries when lookups
//! dominate, and at least a few times the thread count when contention does.
//!
//! # Examples
//!
//! ```
//! use bucket_map::config::BucketMapConfig;
//! use bucket_map::BucketMap;
//! use core::num::NonZeroUsize;
//!
//! let config = BucketMapConfig {
//!     capacity: NonZeroUsize::new(64).unwrap(),
//! };
//! let map = BucketMap::init(config).unwrap();
//! assert_eq!(map.capacity(), 64);
//! ```

use crate::error::MapError;
use core::fmt;
use core::num::NonZeroUsize;

/// Bucket count used by [`BucketMapConfig::default`].
pub const DEFAULT_CAPACITY: usize = 16;

/// Configuration for a [`BucketMap`](crate::BucketMap).
///
/// # Fields
///
/// - `capacity`: Number of buckets, each with its own lock. Fixed after
///   construction; there is no rehashing.
///
/// # Examples
///
/// ```
/// use bucket_map::config::BucketMapConfig;
///
/// // From a signed count, as handed in by a CLI or another caller
/// let config = BucketMapConfig::try_from(8_i64).unwrap();
/// assert_eq!(config.capacity.get(), 8);
///
/// assert!(BucketMapConfig::try_from(0_i64).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BucketMapConfig {
    /// Number of buckets in the map.
    pub capacity: NonZeroUsize,
}

impl BucketMapConfig {
    /// Creates a configuration with the given bucket count.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { capacity }
    }
}

impl Default for BucketMapConfig {
    fn default() -> Self {
        Self {
            capacity: NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl TryFrom<i64> for BucketMapConfig {
    type Error = MapError;

    /// Accepts any capacity of at least one bucket.
    fn try_from(capacity: i64) -> Result<Self, Self::Error> {
        usize::try_from(capacity)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self::new)
            .ok_or(MapError::InvalidArgument { capacity })
    }
}

impl fmt::Debug for BucketMapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketMapConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
