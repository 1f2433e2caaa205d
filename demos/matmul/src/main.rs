//! Matrix multiplication scaling demo.
//!
//! Sweeps a dense matrix multiplication workload across thread counts and
//! prints the average wall-clock time per parallel round. Configuration is
//! read from `threadbench.toml` next to the working directory; defaults
//! apply when the file is missing.
//!
//! ```text
//! [threadbench.toml]
//! name = "Matrix multiplication sweep"
//! thread_counts = [1, 2, 4, 8, 12, 24]
//! warmup_runs = 1
//! measured_runs = 3
//! csv_output_path = "results.csv"
//! ```

mod workload;

use threadbench::{BenchConfig, BenchmarkRunner, ConsoleReporter, CsvExporter, MarkdownReport};
use threadbench_core::Workload;
use tracing_subscriber::EnvFilter;

use crate::workload::MatrixMultiplication;

const MATRIX_SIZE: usize = 400;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match BenchConfig::load("threadbench.toml") {
        Ok(config) => config,
        Err(err) => {
            tracing::debug!(%err, "no usable threadbench.toml, using defaults");
            BenchConfig::new("Matrix multiplication sweep")
                .with_thread_counts(vec![1, 2, 4, 8, 12, 24])
        }
    };

    let workload = MatrixMultiplication::new(MATRIX_SIZE);
    println!("=== Running {} ===", workload.name());

    let runner = BenchmarkRunner::system(config);
    let report = runner.run_all(&workload, &mut ConsoleReporter::new());

    if let Some(path) = runner.config().csv_output_path() {
        if let Err(err) = CsvExporter::to_file(&report, path) {
            tracing::error!(%err, path, "failed to write CSV export");
        }
    }
    if let Some(path) = runner.config().markdown_output_path() {
        if let Err(err) = MarkdownReport::to_file(&report, path) {
            tracing::error!(%err, path, "failed to write Markdown report");
        }
    }

    println!("--------------------------------------------------");
    println!("Benchmark complete.");
}
