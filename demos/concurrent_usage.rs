//! Concurrent Map Usage Examples
//!
//! Multi-threaded usage patterns for `BucketMap`.
//!
//! Run with: cargo run --example concurrent_usage

use bucket_map::config::BucketMapConfig;
use bucket_map::{BucketMap, MapMetrics};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() {
    println!("Concurrent Map Usage Examples");
    println!("=============================\n");

    basic_concurrent_usage();
    println!();

    collisions_and_dump();
    println!();

    capacity_tuning();
    println!();

    shared_teardown();
}

fn basic_concurrent_usage() {
    println!("1. Basic Concurrent Usage");
    println!("   -----------------------");

    let map = BucketMap::new(64).unwrap();
    let start = Instant::now();

    thread::scope(|s| {
        for t in 0..4 {
            let map = &map;
            s.spawn(move || {
                for i in 0..1_000 {
                    let key = t * 1_000 + i;
                    map.put(key, key * 2);
                    if i % 4 == 0 {
                        map.delete(key);
                    }
                }
            });
        }
    });

    println!(
        "   4 threads issued {} operations in {:?}",
        map.ops_count(),
        start.elapsed()
    );
    println!("   Final map size: {} entries", map.len());
    println!("   get(1) = {:?}, get(4) = {:?}", map.get(1), map.get(4));
}

fn collisions_and_dump() {
    println!("2. Collisions and Dump");
    println!("   --------------------");

    let map = BucketMap::init(BucketMapConfig::new(NonZeroUsize::new(4).unwrap())).unwrap();
    map.put(0, 10);
    map.put(4, 20);
    map.put(-3, 30);
    println!("   bucket_index(-3) = {}", map.bucket_index(-3));
    print!("{}", map.dump());
}

fn capacity_tuning() {
    println!("3. Capacity Tuning");
    println!("   ----------------");

    for capacity in [1, 16, 256] {
        let map = BucketMap::new(capacity).unwrap();
        let start = Instant::now();
        thread::scope(|s| {
            for t in 0..8 {
                let map = &map;
                s.spawn(move || {
                    for i in 0..2_000 {
                        map.put(t * 2_000 + i, i);
                    }
                });
            }
        });
        let elapsed = start.elapsed();

        let snapshot = map.snapshot();
        let metrics = snapshot.metrics();
        println!(
            "   capacity {:>4}: {:?}, longest chain {}, mean chain {:.1}",
            capacity, elapsed, metrics["longest_chain"], metrics["mean_chain_length"]
        );
    }
}

fn shared_teardown() {
    println!("4. Teardown of a Shared Map");
    println!("   -------------------------");

    let map = Arc::new(BucketMap::new(8).unwrap());
    let worker = {
        let map = Arc::clone(&map);
        thread::spawn(move || {
            for i in 0..100 {
                map.put(i, i);
            }
            map
        })
    };

    let other = worker.join().unwrap();
    match BucketMap::try_destroy(Arc::clone(&map)) {
        Ok(released) => println!("   released {released} entries"),
        Err(err) => println!("   refused: {err}"),
    }

    drop(other);
    let released = BucketMap::try_destroy(map).unwrap();
    println!("   after the last handle: released {released} entries");
}
