// Console and CSV reporting of a driver run

use std::path::Path;

use crate::error::DriverError;
use crate::models::{CsvResultRow, RunSummary};

pub fn print_summary(summary: &RunSummary) {
    let config = &summary.config;
    println!("Bucket Map Workload");
    println!("===================");
    println!("Capacity: {} buckets", config.capacity);
    println!("Threads: {}", config.threads);
    println!("Operations per thread: {}", config.ops_per_thread);
    println!("Keys per thread: {}", config.keys_per_thread);
    println!("Mix (get,put,delete): {}", config.mix);
    println!("Seed: {}", config.seed);
    println!();

    println!(
        "{:<8} {:>10} {:>10} {:>10} {:>10} {:>12}",
        "Worker", "Gets", "Hits", "Inserts", "Removals", "Time"
    );
    for worker in &summary.workers {
        println!(
            "{:<8} {:>10} {:>10} {:>10} {:>10} {:>12.2?}",
            worker.thread_id,
            worker.gets,
            worker.hits,
            worker.inserts,
            worker.removals,
            worker.elapsed
        );
    }
    println!();

    println!(
        "Completed {} operations in {:.2?} ({:.0} ops/sec)",
        summary.ops_count,
        summary.elapsed,
        summary.ops_per_sec()
    );
    for (name, value) in summary.map_metrics.iter().chain(&summary.snapshot_metrics) {
        println!("  {name:<20} {value:.3}");
    }
    println!();

    println!("Checks");
    for check in &summary.checks {
        let status = if check.passed() { "ok" } else { "FAILED" };
        println!(
            "  {:<32} expected {:>8} got {:>8}  {status}",
            check.name, check.expected, check.actual
        );
    }
    println!("Released {} entries on teardown", summary.released);

    if let Some(dump) = &summary.dump {
        println!();
        print!("{dump}");
    }
}

/// Write the run as a single-row CSV file
pub fn export_csv(summary: &RunSummary, path: &Path) -> Result<(), DriverError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.serialize(CsvResultRow::from(summary))?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DriverConfig, OpMix};
    use crate::runner::DriverRunner;

    #[test]
    fn test_export_csv_writes_header_and_row() {
        let config = DriverConfig {
            capacity: 4,
            threads: 2,
            ops_per_thread: 50,
            keys_per_thread: 8,
            seed: 3,
            mix: OpMix::default(),
        };
        let summary = DriverRunner::new(config).run().unwrap();

        let path = std::env::temp_dir().join(format!("map-driver-{}.csv", std::process::id()));
        export_csv(&summary, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let mut lines = contents.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("capacity,threads,ops_per_thread"));
        assert!(header.ends_with("passed"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("4,2,50,8,3,\"40,40,20\",100,"));
        assert!(row.ends_with("true"));
        assert!(lines.next().is_none());
    }
}
