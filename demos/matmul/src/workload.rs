//! Dense matrix multiplication workload.

use rand::Rng;
use threadbench_core::{Result, Workload, WorkloadError};

/// CPU-bound workload multiplying two random square matrices.
///
/// Uses the naive O(n^3) algorithm on purpose: it maximizes CPU work per
/// invocation and makes scaling and cache-contention effects visible. Each
/// `compute` call generates fresh random inputs, multiplies them, and
/// returns the first element of the product as the checksum, so the
/// computation can never be optimized away.
pub struct MatrixMultiplication {
    size: usize,
}

impl MatrixMultiplication {
    /// Creates a workload over `size` x `size` matrices.
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    fn random_matrix(&self) -> Vec<f64> {
        let mut rng = rand::rng();
        (0..self.size * self.size).map(|_| rng.random()).collect()
    }

    fn multiply(&self, a: &[f64], b: &[f64]) -> Vec<f64> {
        let n = self.size;
        let mut c = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                let mut sum = 0.0;
                for k in 0..n {
                    sum += a[i * n + k] * b[k * n + j];
                }
                c[i * n + j] = sum;
            }
        }
        c
    }
}

impl Workload for MatrixMultiplication {
    fn name(&self) -> String {
        format!("matrix multiplication ({0}x{0})", self.size)
    }

    fn compute(&self) -> Result<u64> {
        if self.size == 0 {
            return Err(WorkloadError::InvalidParameter(
                "matrix size must be >= 1".to_string(),
            ));
        }
        let a = self.random_matrix();
        let b = self.random_matrix();
        let c = self.multiply(&a, &b);

        // Checksum from computed data keeps the multiply alive under
        // optimization.
        Ok(c[0] as u64)
    }
}
