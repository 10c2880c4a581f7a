// Map Driver Library

pub mod error;
pub mod models;
pub mod report;
pub mod runner;
pub mod workload;

pub use error::DriverError;
