//! A fixed-capacity concurrent hash map with per-bucket locking.
//!
//! `bucket-map` stores `i32 → i32` entries in a fixed array of buckets. Each
//! bucket is a singly linked chain behind its own lock, so threads working on
//! different buckets never wait for each other. The number of live entries
//! and the number of operations issued are tracked in two counters that sit
//! in a separate lock domain from the buckets.
//!
//! # Quick Reference
//!
//! | Operation | Method | Returns |
//! |-----------|--------|---------|
//! | create | [`BucketMap::new`] / [`BucketMap::init`] | `Result<BucketMap, MapError>` |
//! | get | [`BucketMap::get`] | `Some(value)` or `None` |
//! | put | [`BucketMap::put`] | `Some(previous)` or `None` for a new key |
//! | delete | [`BucketMap::delete`] | `Some(removed)` or `None` |
//! | dump | [`BucketMap::dump`] / [`BucketMap::snapshot`] | one line per bucket |
//! | destroy | [`BucketMap::destroy`] / [`BucketMap::try_destroy`] | entries released |
//!
//! ## Lock Domains
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                    BucketMap (capacity = N)                        │
//! │                                                                    │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐     ┌──────────┐             │
//! │  │Bucket 0 │ │Bucket 1 │ │Bucket 2 │ ... │Bucket N-1│             │
//! │  │ [Mutex] │ │ [Mutex] │ │ [Mutex] │     │ [Mutex]  │             │
//! │  └─────────┘ └─────────┘ └─────────┘     └──────────┘             │
//! │       ▲           ▲           ▲               ▲                   │
//! │  (k as u32)%N                                                     │
//! │                                                                    │
//! │  size [Mutex]      ops [Mutex]       ← never held with a bucket   │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bucket_map::BucketMap;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let map = Arc::new(BucketMap::new(16).unwrap());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let map = Arc::clone(&map);
//!         thread::spawn(move || {
//!             for i in 0..1000 {
//!                 map.put(t * 1000 + i, i);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(map.len(), 4000);
//! assert_eq!(BucketMap::try_destroy(map), Ok(4000));
//! ```
//!
//! ## Modules
//!
//! - [`map`]: The map itself and its hash function
//! - [`bucket`]: One chain plus the lock guarding it
//! - [`chain`]: Owned singly linked chain of entries
//! - [`entry`]: Chain nodes
//! - [`counter`]: Lock-protected counters for size and operation count
//! - [`snapshot`]: Fully locked views used for dumps and invariant checks
//! - [`config`]: Construction parameters
//! - [`metrics`]: Metrics reporting
//! - [`error`]: Error types

/// Chain node type.
///
/// A node holds one key, its value, and ownership of the next node.
pub mod entry;

/// Owned singly linked chain.
///
/// The per-bucket list of entries with unique keys. No synchronization of its
/// own; reached only through a bucket lock.
pub mod chain;

/// Per-bucket locking.
///
/// Pairs each chain with the `parking_lot::Mutex` that guards it.
pub mod bucket;

/// Lock-protected counters.
pub mod counter;

/// Fixed-capacity concurrent map.
pub mod map;

/// Consistent views of the whole map with every bucket lock held.
pub mod snapshot;

/// Configuration structures.
pub mod config;

/// Error types.
pub mod error;

/// Metrics collection for map and snapshot state.
pub mod metrics;

pub use config::BucketMapConfig;
pub use error::{MapError, Result};
pub use map::{bucket_index, BucketMap};
pub use metrics::MapMetrics;
pub use snapshot::Snapshot;
