//! Per-thread random workloads
//!
//! Each worker owns a contiguous key range no other worker touches, so from
//! its own point of view the shared map behaves sequentially. That lets every
//! single result be checked against a private `hashbrown::HashMap` model even
//! while all workers run at once.

use bucket_map::BucketMap;
use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use std::time::Instant;
use tracing::{debug, warn};

use crate::models::{DriverConfig, OpKind, OpMix, WorkerStats};

pub struct Worker {
    thread_id: usize,
    keys: Range<i32>,
    ops: usize,
    mix: OpMix,
    rng: StdRng,
    model: HashMap<i32, i32>,
}

impl Worker {
    /// Set up worker `thread_id`. The config must already be validated so the
    /// key range cannot overflow.
    pub fn new(thread_id: usize, config: &DriverConfig) -> Self {
        let start = thread_id as i32 * config.keys_per_thread;
        Self {
            thread_id,
            keys: start..start + config.keys_per_thread,
            ops: config.ops_per_thread,
            mix: config.mix,
            rng: StdRng::seed_from_u64(config.seed.wrapping_add(thread_id as u64)),
            model: HashMap::new(),
        }
    }

    pub fn key_range(&self) -> Range<i32> {
        self.keys.clone()
    }

    /// Issue the configured number of operations against `map`
    pub fn run(mut self, map: &BucketMap) -> WorkerStats {
        let mut stats = WorkerStats::new(self.thread_id);
        let start = Instant::now();

        for _ in 0..self.ops {
            let kind = self.mix.pick(self.rng.gen_range(0..100));
            let key = self.rng.gen_range(self.keys.clone());
            let (observed, expected) = match kind {
                OpKind::Get => {
                    stats.gets += 1;
                    let found = map.get(key);
                    if found.is_some() {
                        stats.hits += 1;
                    }
                    (found, self.model.get(&key).copied())
                }
                OpKind::Put => {
                    stats.puts += 1;
                    let value = self.rng.gen::<i32>();
                    let previous = map.put(key, value);
                    if previous.is_none() {
                        stats.inserts += 1;
                    }
                    (previous, self.model.insert(key, value))
                }
                OpKind::Delete => {
                    stats.deletes += 1;
                    let removed = map.delete(key);
                    if removed.is_some() {
                        stats.removals += 1;
                    }
                    (removed, self.model.remove(&key))
                }
            };

            if observed != expected {
                stats.mismatches += 1;
                warn!(
                    worker = self.thread_id,
                    op = %kind,
                    key,
                    ?observed,
                    ?expected,
                    "map result disagrees with model"
                );
            }
        }

        stats.live_keys = self.model.len();
        stats.elapsed = start.elapsed();
        debug!(
            worker = self.thread_id,
            ops = stats.ops(),
            live = stats.live_keys,
            elapsed = ?stats.elapsed,
            "worker finished"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(threads: usize) -> DriverConfig {
        DriverConfig {
            capacity: 4,
            threads,
            ops_per_thread: 2_000,
            keys_per_thread: 32,
            seed: 7,
            mix: OpMix::default(),
        }
    }

    #[test]
    fn test_key_ranges_are_disjoint() {
        let config = config(3);
        let ranges: Vec<_> = (0..3).map(|t| Worker::new(t, &config).key_range()).collect();
        assert_eq!(ranges, vec![0..32, 32..64, 64..96]);
    }

    #[test]
    fn test_single_worker_agrees_with_model() {
        let config = config(1);
        let map = BucketMap::new(config.capacity).unwrap();
        let stats = Worker::new(0, &config).run(&map);

        assert_eq!(stats.ops(), 2_000);
        assert_eq!(stats.mismatches, 0);
        assert_eq!(map.ops_count(), 2_000);
        assert_eq!(map.len(), stats.inserts - stats.removals);
        assert_eq!(map.len(), stats.live_keys);
    }

    #[test]
    fn test_same_seed_same_workload() {
        let config = config(1);
        let first = BucketMap::new(4).unwrap();
        let second = BucketMap::new(4).unwrap();
        Worker::new(0, &config).run(&first);
        Worker::new(0, &config).run(&second);
        assert_eq!(first.dump(), second.dump());
    }
}
