//! Report sinks and exporters for scaling results.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::error::BenchError;
use crate::result::{BenchmarkReport, MeasurementOutcome};

/// Consumer of per-thread-count outcomes as the sweep progresses.
///
/// The runner calls exactly one of these per configured thread count, in
/// configuration order.
pub trait ReportSink {
    /// A thread count measured successfully with the given average.
    fn on_result(&mut self, threads: usize, avg: Duration);

    /// A thread count failed to measure.
    fn on_error(&mut self, threads: usize, error: &BenchError);
}

/// Sink that prints one aligned line per thread count to the console.
///
/// Timing lines go to stdout, error lines to stderr, so a failed thread
/// count shows an error line in place of its timing line.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for ConsoleReporter {
    fn on_result(&mut self, threads: usize, avg: Duration) {
        println!("Threads: {threads:>2} | Avg Time: {:>6} ms", avg.as_millis());
    }

    fn on_error(&mut self, threads: usize, error: &BenchError) {
        eprintln!("Threads: {threads:>2} | Error: {error}");
    }
}

/// Sink that discards everything. Useful in tests and when only the
/// returned [`BenchmarkReport`] matters.
#[derive(Debug, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn on_result(&mut self, _threads: usize, _avg: Duration) {}

    fn on_error(&mut self, _threads: usize, _error: &BenchError) {}
}

/// CSV exporter for scaling reports.
///
/// One row per configured thread count, with an empty duration cell and a
/// populated error cell for failed entries.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use threadbench::{BenchmarkReport, CsvExporter};
///
/// let mut report = BenchmarkReport::new("Sweep", "matmul");
/// report.add_measured(1, Duration::from_millis(400));
/// let csv = CsvExporter::to_string(&report);
/// assert!(csv.contains("threads,avg_time_ms,error"));
/// assert!(csv.contains("1,400,"));
/// ```
pub struct CsvExporter;

impl CsvExporter {
    /// Exports a report to a CSV string.
    pub fn to_string(report: &BenchmarkReport) -> String {
        let mut output = String::new();

        writeln!(output, "threads,avg_time_ms,error").unwrap();
        for m in &report.measurements {
            match &m.outcome {
                MeasurementOutcome::Measured(avg) => {
                    writeln!(output, "{},{},", m.threads, avg.as_millis()).unwrap();
                }
                MeasurementOutcome::Failed(message) => {
                    writeln!(output, "{},,{}", m.threads, message.replace(',', ";")).unwrap();
                }
            }
        }

        output
    }

    /// Exports a report to a CSV file.
    pub fn to_file(report: &BenchmarkReport, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, Self::to_string(report))
    }

    /// Writes a report as CSV to a writer.
    pub fn write<W: Write>(report: &BenchmarkReport, mut writer: W) -> io::Result<()> {
        writer.write_all(Self::to_string(report).as_bytes())
    }
}

/// Markdown report generator.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use threadbench::{BenchmarkReport, MarkdownReport};
///
/// let mut report = BenchmarkReport::new("Sweep", "matmul (400x400)");
/// report.add_measured(2, Duration::from_millis(210));
/// let md = MarkdownReport::to_string(&report);
/// assert!(md.contains("# Benchmark: Sweep"));
/// assert!(md.contains("| Threads | Avg Time (ms) |"));
/// ```
pub struct MarkdownReport;

impl MarkdownReport {
    /// Generates a Markdown report string.
    pub fn to_string(report: &BenchmarkReport) -> String {
        let mut output = String::new();

        writeln!(output, "# Benchmark: {}", report.name).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Workload: {}", report.workload_name).unwrap();
        writeln!(output).unwrap();

        writeln!(output, "## Results").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Threads | Avg Time (ms) |").unwrap();
        writeln!(output, "|--------:|--------------:|").unwrap();
        for m in &report.measurements {
            match &m.outcome {
                MeasurementOutcome::Measured(avg) => {
                    writeln!(output, "| {} | {} |", m.threads, avg.as_millis()).unwrap();
                }
                MeasurementOutcome::Failed(message) => {
                    writeln!(output, "| {} | failed: {} |", m.threads, message).unwrap();
                }
            }
        }

        if let Some(fastest) = report.fastest() {
            writeln!(output).unwrap();
            writeln!(
                output,
                "Fastest: {} threads ({} ms avg)",
                fastest.threads,
                fastest
                    .avg_duration()
                    .unwrap_or(Duration::ZERO)
                    .as_millis()
            )
            .unwrap();
        }

        output
    }

    /// Writes the Markdown report to a file.
    pub fn to_file(report: &BenchmarkReport, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, Self::to_string(report))
    }
}
