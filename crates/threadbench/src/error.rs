//! Error types for the benchmark executor.

use thiserror::Error;
use threadbench_core::WorkloadError;

/// Error that fails one thread count's measurement.
///
/// Affinity failures never appear here: they are swallowed at the advisor
/// boundary and only surface as a diagnostic. A `BenchError` aborts the
/// current `run_benchmark` call but never the surrounding `run_all` sweep.
#[derive(Debug, Error)]
pub enum BenchError {
    /// A worker's `compute()` failed.
    #[error("Workload error: {0}")]
    Workload(#[from] WorkloadError),

    /// The trial itself could not be executed (worker spawn failure,
    /// worker panic).
    #[error("Trial execution failed: {0}")]
    Trial(String),
}
