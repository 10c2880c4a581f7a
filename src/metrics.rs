//! Bucket Map Metrics
//!
//! Reports map state as `BTreeMap<String, f64>` so metric names always come
//! out in the same order, which keeps driver output and CSV exports stable
//! between runs.
//!
//! Two reporters exist, one per lock domain:
//!
//! | Reporter | Reads | Metrics |
//! |----------|-------|---------|
//! | [`BucketMap`] | counter locks only | `capacity`, `size`, `ops_count`, `load_factor` |
//! | [`Snapshot`] | chains (bucket locks already held) | `buckets`, `entries`, `empty_buckets`, `longest_chain`, `mean_chain_length` |
//!
//! Neither reporter touches the other domain's locks.

use crate::map::BucketMap;
use crate::snapshot::Snapshot;
use std::collections::BTreeMap;

/// Uniform metrics reporting for bucket maps and their snapshots.
pub trait MapMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Name identifying the reporter (e.g. "BucketMap").
    fn reporter_name(&self) -> &'static str;
}

impl MapMetrics for BucketMap {
    fn metrics(&self) -> BTreeMap<String, f64> {
        let capacity = self.capacity() as f64;
        let size = self.len() as f64;

        let mut metrics = BTreeMap::new();
        metrics.insert("capacity".to_string(), capacity);
        metrics.insert("load_factor".to_string(), size / capacity);
        metrics.insert("ops_count".to_string(), self.ops_count() as f64);
        metrics.insert("size".to_string(), size);
        metrics
    }

    fn reporter_name(&self) -> &'static str {
        "BucketMap"
    }
}

impl MapMetrics for Snapshot<'_> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        let buckets = self.capacity() as f64;
        let entries = self.entry_count() as f64;

        let mut metrics = BTreeMap::new();
        metrics.insert("buckets".to_string(), buckets);
        metrics.insert("empty_buckets".to_string(), self.empty_buckets() as f64);
        metrics.insert("entries".to_string(), entries);
        metrics.insert("longest_chain".to_string(), self.longest_chain() as f64);
        metrics.insert("mean_chain_length".to_string(), entries / buckets);
        metrics
    }

    fn reporter_name(&self) -> &'static str {
        "Snapshot"
    }
}
