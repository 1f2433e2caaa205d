//! The workload contract.

use crate::error::Result;

/// A unit of CPU-bound work that the benchmark executor can drive.
///
/// Implementations are constructed once with their parameters fixed (e.g. a
/// problem size), then invoked repeatedly — once per worker per trial — from
/// many threads concurrently. They must not carry mutable state across
/// invocations; `compute` takes `&self` and the trait requires `Sync`.
///
/// # Dead-code elimination
///
/// `compute` must return a checksum derived from the data it actually
/// computed (one element of a result matrix, a folded sum, ...), never a
/// constant. An optimizing compiler is otherwise free to delete the whole
/// computation, and the benchmark would measure nothing. This is a
/// correctness requirement of the contract, not a per-implementation choice.
///
/// # Example
///
/// ```
/// use threadbench_core::{Result, Workload};
///
/// struct SumOfSquares(u64);
///
/// impl Workload for SumOfSquares {
///     fn name(&self) -> String {
///         format!("sum of squares (n={})", self.0)
///     }
///
///     fn compute(&self) -> Result<u64> {
///         // Checksum comes from the computed data itself.
///         Ok((1..=self.0).map(|i| i.wrapping_mul(i)).fold(0, u64::wrapping_add))
///     }
/// }
///
/// let w = SumOfSquares(3);
/// assert_eq!(w.compute().unwrap(), 14);
/// ```
pub trait Workload: Send + Sync {
    /// Returns a stable, human-readable name including any relevant
    /// parameters (e.g. "matrix multiplication (400x400)").
    fn name(&self) -> String;

    /// Performs the computation and returns a checksum derived from the
    /// computed data.
    ///
    /// Invoked exactly once per worker per trial. A returned error fails
    /// the enclosing trial; the executor never retries.
    fn compute(&self) -> Result<u64>;
}
