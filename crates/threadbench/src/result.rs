//! Benchmark result types.

use std::time::Duration;

/// One measured trial: a complete parallel round at a fixed thread count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialRecord {
    /// Trial index within the measured phase (0-based).
    pub trial_index: usize,
    /// Wall-clock duration of the round.
    pub duration: Duration,
}

/// Outcome of one thread count's measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeasurementOutcome {
    /// Average duration across the measured trials.
    Measured(Duration),
    /// The measurement failed; the message describes why.
    Failed(String),
}

/// A single entry of a scaling sweep: one thread count and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalingMeasurement {
    /// Number of worker threads used.
    pub threads: usize,
    /// Result for this thread count.
    pub outcome: MeasurementOutcome,
}

impl ScalingMeasurement {
    /// Returns the average duration, if the measurement succeeded.
    pub fn avg_duration(&self) -> Option<Duration> {
        match &self.outcome {
            MeasurementOutcome::Measured(avg) => Some(*avg),
            MeasurementOutcome::Failed(_) => None,
        }
    }
}

/// Aggregated results of a full scaling sweep over one workload.
///
/// Entries keep the order of the configured thread-count sequence.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use threadbench::BenchmarkReport;
///
/// let mut report = BenchmarkReport::new("Sweep", "matmul (400x400)");
/// report.add_measured(1, Duration::from_millis(400));
/// report.add_measured(2, Duration::from_millis(210));
/// report.add_failed(64, "Trial execution failed: failed to spawn worker 63");
///
/// assert_eq!(report.avg_for(2), Some(Duration::from_millis(210)));
/// assert_eq!(report.avg_for(64), None);
/// assert_eq!(report.fastest().map(|m| m.threads), Some(2));
/// assert!(report.has_failures());
/// ```
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    /// Benchmark name (from the configuration).
    pub name: String,
    /// Name of the workload that was driven.
    pub workload_name: String,
    /// Per-thread-count measurements, in configuration order.
    pub measurements: Vec<ScalingMeasurement>,
}

impl BenchmarkReport {
    /// Creates an empty report.
    pub fn new(name: impl Into<String>, workload_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            workload_name: workload_name.into(),
            measurements: Vec::new(),
        }
    }

    /// Appends a successful measurement.
    pub fn add_measured(&mut self, threads: usize, avg: Duration) {
        self.measurements.push(ScalingMeasurement {
            threads,
            outcome: MeasurementOutcome::Measured(avg),
        });
    }

    /// Appends a failed measurement.
    pub fn add_failed(&mut self, threads: usize, message: impl Into<String>) {
        self.measurements.push(ScalingMeasurement {
            threads,
            outcome: MeasurementOutcome::Failed(message.into()),
        });
    }

    /// Returns the average duration for the first entry with the given
    /// thread count, if it succeeded.
    pub fn avg_for(&self, threads: usize) -> Option<Duration> {
        self.measurements
            .iter()
            .find(|m| m.threads == threads)
            .and_then(ScalingMeasurement::avg_duration)
    }

    /// Returns the successful measurement with the lowest average duration.
    pub fn fastest(&self) -> Option<&ScalingMeasurement> {
        self.measurements
            .iter()
            .filter(|m| m.avg_duration().is_some())
            .min_by_key(|m| m.avg_duration())
    }

    /// Returns true if any thread count failed to measure.
    pub fn has_failures(&self) -> bool {
        self.measurements
            .iter()
            .any(|m| matches!(m.outcome, MeasurementOutcome::Failed(_)))
    }
}
