//! Benchmark configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for a scaling benchmark sweep.
///
/// Controls the thread counts to test (in report order), warm-up and
/// measured trial counts, and optional output paths.
///
/// # Example
///
/// ```
/// use threadbench::BenchConfig;
///
/// let config = BenchConfig::new("My Benchmark")
///     .with_thread_counts(vec![1, 2, 4, 8, 12, 24])
///     .with_warmup_runs(1)
///     .with_measured_runs(3);
///
/// assert_eq!(config.name(), "My Benchmark");
/// assert_eq!(config.warmup_runs(), 1);
/// assert_eq!(config.measured_runs(), 3);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct BenchConfig {
    name: String,
    thread_counts: Vec<usize>,
    warmup_runs: usize,
    measured_runs: usize,
    csv_output_path: Option<String>,
    markdown_output_path: Option<String>,
}

impl BenchConfig {
    /// Creates a new configuration with the given name.
    ///
    /// Defaults:
    /// - thread_counts: `[1, 2, 4, 8]`
    /// - warmup_runs: 1
    /// - measured_runs: 3
    ///
    /// # Example
    ///
    /// ```
    /// use threadbench::BenchConfig;
    ///
    /// let config = BenchConfig::new("Test Benchmark");
    /// assert_eq!(config.thread_counts(), &[1, 2, 4, 8]);
    /// assert_eq!(config.warmup_runs(), 1);
    /// assert_eq!(config.measured_runs(), 3);
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            thread_counts: vec![1, 2, 4, 8],
            warmup_runs: 1,
            measured_runs: 3,
            csv_output_path: None,
            markdown_output_path: None,
        }
    }

    /// Sets the ordered sequence of thread counts to benchmark.
    ///
    /// Duplicates are allowed; the order here is the report order. Entries
    /// must be at least 1 — the runner rejects a zero entry with an error
    /// line instead of timing an empty round.
    pub fn with_thread_counts(mut self, counts: Vec<usize>) -> Self {
        self.thread_counts = counts;
        self
    }

    /// Sets the number of warm-up trials per thread count (not measured).
    pub fn with_warmup_runs(mut self, runs: usize) -> Self {
        self.warmup_runs = runs;
        self
    }

    /// Sets the number of measured trials per thread count.
    ///
    /// With zero measured runs a benchmark reports a zero average and
    /// performs only warm-up trials.
    pub fn with_measured_runs(mut self, runs: usize) -> Self {
        self.measured_runs = runs;
        self
    }

    /// Sets the output path for CSV export.
    pub fn with_csv_output(mut self, path: impl Into<String>) -> Self {
        self.csv_output_path = Some(path.into());
        self
    }

    /// Sets the output path for the Markdown report.
    pub fn with_markdown_output(mut self, path: impl Into<String>) -> Self {
        self.markdown_output_path = Some(path.into());
        self
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Example
    ///
    /// ```
    /// use threadbench::BenchConfig;
    ///
    /// let config = BenchConfig::from_toml_str(r#"
    ///     name = "Sweep"
    ///     thread_counts = [1, 2, 4]
    ///     warmup_runs = 2
    ///     measured_runs = 5
    /// "#).unwrap();
    ///
    /// assert_eq!(config.name(), "Sweep");
    /// assert_eq!(config.measured_runs(), 5);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Example
    ///
    /// ```
    /// use threadbench::BenchConfig;
    ///
    /// let config = BenchConfig::load("threadbench.toml").unwrap_or_default();
    /// // Proceeds with defaults if the file doesn't exist
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.thread_counts.iter().any(|&t| t == 0) {
            return Err(ConfigError::Invalid(
                "thread_counts entries must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the benchmark name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordered thread counts to benchmark.
    pub fn thread_counts(&self) -> &[usize] {
        &self.thread_counts
    }

    /// Returns the number of warm-up trials per thread count.
    pub fn warmup_runs(&self) -> usize {
        self.warmup_runs
    }

    /// Returns the number of measured trials per thread count.
    pub fn measured_runs(&self) -> usize {
        self.measured_runs
    }

    /// Returns the CSV output path, if set.
    pub fn csv_output_path(&self) -> Option<&str> {
        self.csv_output_path.as_deref()
    }

    /// Returns the Markdown output path, if set.
    pub fn markdown_output_path(&self) -> Option<&str> {
        self.markdown_output_path.as_deref()
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::new("Benchmark")
    }
}
