//! Thread-scaling benchmark executor.
//!
//! This crate drives a CPU-bound [`Workload`](threadbench_core::Workload)
//! across a sequence of thread counts and reports how the wall-clock time
//! per parallel round changes with concurrency.
//!
//! # Overview
//!
//! For each configured thread count the executor:
//! - runs a number of warm-up trials whose timings are discarded,
//! - runs a number of measured trials, each on a fresh pool of exactly
//!   that many worker threads,
//! - optionally pins each worker to logical core `worker_id % cores`,
//! - reports the arithmetic mean of the measured trial durations.
//!
//! A failing thread count produces an error line instead of a timing line;
//! the remaining thread counts still run.
//!
//! # Example
//!
//! ```
//! use threadbench::BenchConfig;
//!
//! let config = BenchConfig::new("Scaling sweep")
//!     .with_thread_counts(vec![1, 2, 4])
//!     .with_warmup_runs(1)
//!     .with_measured_runs(3);
//!
//! assert_eq!(config.name(), "Scaling sweep");
//! assert_eq!(config.thread_counts(), &[1, 2, 4]);
//! ```
//!
//! Full harness usage:
//!
//! ```text
//! let runner = BenchmarkRunner::system(config);
//! let report = runner.run_all(&workload, &mut ConsoleReporter::new());
//! println!("{}", MarkdownReport::to_string(&report));
//! ```

mod clock;
mod config;
mod error;
mod report;
mod result;
mod runner;

pub use clock::{Clock, SystemClock};
pub use config::{BenchConfig, ConfigError};
pub use error::BenchError;
pub use report::{ConsoleReporter, CsvExporter, MarkdownReport, NullSink, ReportSink};
pub use result::{BenchmarkReport, MeasurementOutcome, ScalingMeasurement, TrialRecord};
pub use runner::BenchmarkRunner;
