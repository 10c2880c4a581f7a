use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use map_driver::models::{DriverConfig, OpMix};
use map_driver::runner::DriverRunner;
use map_driver::{report, DriverError};

/// Multi-threaded workload driver for the bucket map
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of buckets
    #[arg(short, long, default_value = "16", allow_negative_numbers = true)]
    capacity: i64,

    /// Number of worker threads
    #[arg(short, long, default_value = "8")]
    threads: usize,

    /// Operations issued by each worker
    #[arg(short, long, default_value = "10000")]
    ops: usize,

    /// Size of each worker's private key range
    #[arg(short, long, default_value = "1024")]
    keys_per_thread: i32,

    /// Base seed; worker t is seeded with seed + t
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Percentages of get,put,delete operations
    #[arg(short, long, default_value = "40,40,20")]
    mix: OpMix,

    /// Print every bucket chain after the run
    #[arg(long)]
    dump: bool,

    /// Export results to CSV file
    #[arg(long, value_name = "PATH")]
    output_csv: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = DriverConfig {
        capacity: args.capacity,
        threads: args.threads,
        ops_per_thread: args.ops,
        keys_per_thread: args.keys_per_thread,
        seed: args.seed,
        mix: args.mix,
    };

    let summary = DriverRunner::new(config).with_dump(args.dump).run()?;
    report::print_summary(&summary);

    if let Some(path) = &args.output_csv {
        report::export_csv(&summary, path)?;
        println!("\nResults exported to {}", path.display());
    }

    if !summary.passed() {
        return Err(DriverError::VerificationFailed {
            failed: summary.failed_checks(),
        }
        .into());
    }
    Ok(())
}
