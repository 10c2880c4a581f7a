// Data models for driver runs

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::DriverError;

/// The three map operations a worker can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpKind {
    Get,
    Put,
    Delete,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Get => "get",
            OpKind::Put => "put",
            OpKind::Delete => "delete",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Percentages of gets, puts and deletes in a workload. Always sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpMix {
    pub get: u8,
    pub put: u8,
    pub delete: u8,
}

impl OpMix {
    /// Build a mix, rejecting percentages that don't add up to 100
    pub fn new(get: u8, put: u8, delete: u8) -> Result<Self, DriverError> {
        let total = u16::from(get) + u16::from(put) + u16::from(delete);
        if total != 100 {
            return Err(DriverError::InvalidMix(format!(
                "{get},{put},{delete} sums to {total}, expected 100"
            )));
        }
        Ok(Self { get, put, delete })
    }

    /// Map a roll in `0..100` onto an operation
    pub fn pick(&self, roll: u8) -> OpKind {
        if roll < self.get {
            OpKind::Get
        } else if roll < self.get + self.put {
            OpKind::Put
        } else {
            OpKind::Delete
        }
    }
}

impl Default for OpMix {
    fn default() -> Self {
        Self {
            get: 40,
            put: 40,
            delete: 20,
        }
    }
}

impl FromStr for OpMix {
    type Err = DriverError;

    /// Parses `get,put,delete` percentages, e.g. `40,40,20`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [get, put, delete] = parts.as_slice() else {
            return Err(DriverError::InvalidMix(format!(
                "'{s}' must be three comma-separated percentages"
            )));
        };
        let parse = |p: &str| {
            p.parse::<u8>()
                .map_err(|_| DriverError::InvalidMix(format!("'{p}' is not a percentage")))
        };
        OpMix::new(parse(get)?, parse(put)?, parse(delete)?)
    }
}

impl fmt::Display for OpMix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.get, self.put, self.delete)
    }
}

/// Parameters of a driver run
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Bucket count handed to the map
    pub capacity: i64,
    /// Number of worker threads
    pub threads: usize,
    /// Operations issued by each worker
    pub ops_per_thread: usize,
    /// Size of each worker's private key range
    pub keys_per_thread: i32,
    /// Base seed; worker `t` uses `seed + t`
    pub seed: u64,
    /// Operation mix
    pub mix: OpMix,
}

impl DriverConfig {
    /// Check the parameters that the map itself does not validate
    pub fn validate(&self) -> Result<(), DriverError> {
        if self.threads == 0 {
            return Err(DriverError::NoThreads);
        }
        let fits = i32::try_from(self.threads)
            .ok()
            .and_then(|threads| threads.checked_mul(self.keys_per_thread))
            .is_some();
        if self.keys_per_thread <= 0 || !fits {
            return Err(DriverError::KeySpace {
                threads: self.threads,
                keys_per_thread: self.keys_per_thread,
            });
        }
        Ok(())
    }

    /// Total operations across all workers
    pub fn total_ops(&self) -> usize {
        self.threads * self.ops_per_thread
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            capacity: 16,
            threads: 8,
            ops_per_thread: 10_000,
            keys_per_thread: 1024,
            seed: 42,
            mix: OpMix::default(),
        }
    }
}

/// What a single worker did and observed
#[derive(Debug, Clone, Default)]
pub struct WorkerStats {
    pub thread_id: usize,
    pub gets: usize,
    pub hits: usize,
    pub puts: usize,
    pub inserts: usize,
    pub deletes: usize,
    pub removals: usize,
    /// Results that disagreed with the worker's own model
    pub mismatches: usize,
    /// Keys the worker's model holds at the end
    pub live_keys: usize,
    pub elapsed: Duration,
}

impl WorkerStats {
    pub fn new(thread_id: usize) -> Self {
        Self {
            thread_id,
            ..Default::default()
        }
    }

    pub fn ops(&self) -> usize {
        self.gets + self.puts + self.deletes
    }
}

/// One post-run verification
#[derive(Debug, Clone)]
pub struct Check {
    pub name: &'static str,
    pub expected: usize,
    pub actual: usize,
}

impl Check {
    pub fn new(name: &'static str, expected: usize, actual: usize) -> Self {
        Self {
            name,
            expected,
            actual,
        }
    }

    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// Everything a driver run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub config: DriverConfig,
    pub workers: Vec<WorkerStats>,
    pub ops_count: usize,
    pub size: usize,
    pub elapsed: Duration,
    pub map_metrics: BTreeMap<String, f64>,
    pub snapshot_metrics: BTreeMap<String, f64>,
    pub checks: Vec<Check>,
    /// Rendered chains, if a dump was requested
    pub dump: Option<String>,
    /// Entries released by teardown
    pub released: usize,
}

impl RunSummary {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(Check::passed)
    }

    pub fn failed_checks(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed()).count()
    }

    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.ops_count as f64 / secs
        } else {
            0.0
        }
    }

    fn sum(&self, field: impl Fn(&WorkerStats) -> usize) -> usize {
        self.workers.iter().map(field).sum()
    }

    pub fn total_inserts(&self) -> usize {
        self.sum(|w| w.inserts)
    }

    pub fn total_removals(&self) -> usize {
        self.sum(|w| w.removals)
    }

    pub fn total_hits(&self) -> usize {
        self.sum(|w| w.hits)
    }

    pub fn total_gets(&self) -> usize {
        self.sum(|w| w.gets)
    }

    pub fn total_mismatches(&self) -> usize {
        self.sum(|w| w.mismatches)
    }
}

/// Flat row for CSV export
#[derive(Debug, Serialize)]
pub struct CsvResultRow {
    pub capacity: i64,
    pub threads: usize,
    pub ops_per_thread: usize,
    pub keys_per_thread: i32,
    pub seed: u64,
    pub mix: String,
    pub ops_count: usize,
    pub size: usize,
    pub inserts: usize,
    pub removals: usize,
    pub gets: usize,
    pub hits: usize,
    pub mismatches: usize,
    pub longest_chain: usize,
    pub load_factor: f64,
    pub elapsed_ms: u64,
    pub ops_per_sec: f64,
    pub passed: bool,
}

impl From<&RunSummary> for CsvResultRow {
    fn from(summary: &RunSummary) -> Self {
        let metric = |map: &BTreeMap<String, f64>, key: &str| {
            map.get(key).copied().unwrap_or(0.0)
        };
        Self {
            capacity: summary.config.capacity,
            threads: summary.config.threads,
            ops_per_thread: summary.config.ops_per_thread,
            keys_per_thread: summary.config.keys_per_thread,
            seed: summary.config.seed,
            mix: summary.config.mix.to_string(),
            ops_count: summary.ops_count,
            size: summary.size,
            inserts: summary.total_inserts(),
            removals: summary.total_removals(),
            gets: summary.total_gets(),
            hits: summary.total_hits(),
            mismatches: summary.total_mismatches(),
            longest_chain: metric(&summary.snapshot_metrics, "longest_chain") as usize,
            load_factor: metric(&summary.map_metrics, "load_factor"),
            elapsed_ms: u64::try_from(summary.elapsed.as_millis()).unwrap_or(u64::MAX),
            ops_per_sec: summary.ops_per_sec(),
            passed: summary.passed(),
        }
    }
}
