//! Error types for workload implementations.

use thiserror::Error;

/// Error reported by a [`Workload`](crate::Workload) implementation.
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// The workload was constructed with parameters it cannot execute
    /// (e.g. a zero-sized matrix).
    #[error("Invalid workload parameter: {0}")]
    InvalidParameter(String),

    /// The computation itself failed.
    #[error("Workload computation failed: {0}")]
    Failed(String),
}

/// Result type alias for workload operations.
pub type Result<T> = std::result::Result<T, WorkloadError>;
