//! Core types for threadbench.
//!
//! This crate defines the [`Workload`] contract that the benchmark executor
//! drives, together with the error type workload implementations report.
//! Everything else (the executor, affinity advisors, reporting) lives in the
//! sibling crates and depends on this one.

mod error;
mod workload;

pub use error::{Result, WorkloadError};
pub use workload::Workload;
