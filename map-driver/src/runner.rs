//! Runs a multi-threaded workload against one shared map and verifies the
//! map's counters and chains once every worker has joined.

use bucket_map::{BucketMap, MapMetrics};
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::DriverError;
use crate::models::{Check, DriverConfig, RunSummary, WorkerStats};
use crate::workload::Worker;

pub struct DriverRunner {
    config: DriverConfig,
    dump: bool,
}

impl DriverRunner {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            dump: false,
        }
    }

    /// Also render every chain into the summary
    pub fn with_dump(mut self, dump: bool) -> Self {
        self.dump = dump;
        self
    }

    pub fn run(self) -> Result<RunSummary, DriverError> {
        let config = self.config;
        config.validate()?;

        let map = BucketMap::new(config.capacity)?;
        info!(
            capacity = config.capacity,
            threads = config.threads,
            ops_per_thread = config.ops_per_thread,
            mix = %config.mix,
            "starting workload"
        );

        let start = Instant::now();
        let workers = thread::scope(|s| {
            let handles: Vec<_> = (0..config.threads)
                .map(|t| {
                    let worker = Worker::new(t, &config);
                    let map = &map;
                    s.spawn(move || worker.run(map))
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(thread_id, handle)| {
                    handle
                        .join()
                        .map_err(|_| DriverError::WorkerPanicked { thread_id })
                })
                .collect::<Result<Vec<WorkerStats>, DriverError>>()
        })?;
        let elapsed = start.elapsed();

        let ops_count = map.ops_count();
        let size = map.len();
        let map_metrics = map.metrics();

        let (snapshot_metrics, entries, unique, home, dump) = {
            let snapshot = map.snapshot();
            (
                snapshot.metrics(),
                snapshot.entry_count(),
                snapshot.has_unique_keys(),
                snapshot.keys_in_home_buckets(),
                self.dump.then(|| snapshot.to_string()),
            )
        };

        let inserts: usize = workers.iter().map(|w| w.inserts).sum();
        let removals: usize = workers.iter().map(|w| w.removals).sum();
        let live: usize = workers.iter().map(|w| w.live_keys).sum();
        let mismatches: usize = workers.iter().map(|w| w.mismatches).sum();

        let checks = vec![
            Check::new("operation count", config.total_ops(), ops_count),
            Check::new("size vs net inserts", inserts.saturating_sub(removals), size),
            Check::new("size vs worker models", live, size),
            Check::new("linked entries vs size", size, entries),
            Check::new("results disagreeing with model", 0, mismatches),
            Check::new("chains with unique keys", 1, usize::from(unique)),
            Check::new("keys in home buckets", 1, usize::from(home)),
        ];
        for check in checks.iter().filter(|c| !c.passed()) {
            debug!(
                check = check.name,
                expected = check.expected,
                actual = check.actual,
                "check failed"
            );
        }

        let released = map.destroy();
        info!(?elapsed, ops_count, size, released, "workload finished");

        Ok(RunSummary {
            config,
            workers,
            ops_count,
            size,
            elapsed,
            map_metrics,
            snapshot_metrics,
            checks,
            dump,
            released,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OpMix;

    #[test]
    fn test_run_passes_all_checks() {
        let config = DriverConfig {
            capacity: 8,
            threads: 4,
            ops_per_thread: 3_000,
            keys_per_thread: 64,
            seed: 11,
            mix: OpMix::default(),
        };
        let summary = DriverRunner::new(config).run().unwrap();

        assert!(summary.passed(), "{:?}", summary.checks);
        assert_eq!(summary.ops_count, 12_000);
        assert_eq!(summary.workers.len(), 4);
        assert_eq!(summary.released, summary.size);
        assert!(summary.dump.is_none());
        assert_eq!(summary.map_metrics.get("capacity"), Some(&8.0));
    }

    #[test]
    fn test_dump_is_rendered_on_request() {
        let config = DriverConfig {
            capacity: 3,
            threads: 2,
            ops_per_thread: 1_000,
            keys_per_thread: 10,
            seed: 1,
            mix: OpMix::new(0, 100, 0).unwrap(),
        };
        let summary = DriverRunner::new(config).with_dump(true).run().unwrap();

        let dump = summary.dump.unwrap();
        assert_eq!(dump.lines().count(), 3);
        assert!(dump.starts_with("[0] -> "));
        // puts only, over 20 keys in total
        assert_eq!(summary.size, 20);
    }

    #[test]
    fn test_invalid_capacity_is_reported() {
        let config = DriverConfig {
            capacity: 0,
            ..Default::default()
        };
        let err = DriverRunner::new(config).run().unwrap_err();
        assert!(matches!(err, DriverError::Map(_)));
    }
}
