//! Error types for bucket map construction and teardown.
//!
//! Lookups never fail: a missing key is reported as `None` by
//! [`get`](crate::BucketMap::get), [`put`](crate::BucketMap::put) and
//! [`delete`](crate::BucketMap::delete). Only the lifecycle edges can go wrong.

use thiserror::Error;

/// Result type alias for bucket map operations.
pub type Result<T> = core::result::Result<T, MapError>;

/// Errors raised while creating or tearing down a [`BucketMap`](crate::BucketMap).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// The requested capacity is zero or negative.
    #[error("invalid argument: capacity must be at least 1, got {capacity}")]
    InvalidArgument {
        /// The rejected capacity
        capacity: i64,
    },

    /// The bucket array could not be allocated.
    #[error("resource exhausted: cannot allocate {buckets} buckets")]
    ResourceExhausted {
        /// Number of buckets that was requested
        buckets: usize,
    },

    /// Teardown was requested while other handles could still be operating on the map.
    #[error("precondition violated: map is still shared by {other_handles} other handle(s)")]
    PreconditionViolation {
        /// Handles alive besides the caller's
        other_handles: usize,
    },
}
