// Driver errors

use bucket_map::MapError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("invalid operation mix: {0}")]
    InvalidMix(String),

    #[error("at least one worker thread is required")]
    NoThreads,

    #[error("{threads} threads x {keys_per_thread} keys does not fit the i32 key space")]
    KeySpace { threads: usize, keys_per_thread: i32 },

    #[error("worker {thread_id} panicked")]
    WorkerPanicked { thread_id: usize },

    #[error("{failed} verification check(s) failed")]
    VerificationFailed { failed: usize },

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
