//! Benchmark runner.

use std::time::Duration;

use threadbench_affinity::{CoreAdvisor, SystemCoreAdvisor};
use threadbench_core::Workload;

use crate::clock::{Clock, SystemClock};
use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::report::ReportSink;
use crate::result::{BenchmarkReport, TrialRecord};

/// Thread-scaling benchmark executor.
///
/// Drives a workload through warm-up and measured trials for each
/// configured thread count. Every trial runs on a fresh pool of exactly
/// `threads` worker threads; pools are never reused across trials, so no
/// scheduling or affinity state carries over. The advisor and clock are
/// concrete generic parameters so tests can substitute deterministic fakes
/// without dynamic dispatch on the hot path.
///
/// The driving logic is single-threaded; only the workers of the current
/// trial run concurrently.
pub struct BenchmarkRunner<A, C>
where
    A: CoreAdvisor,
    C: Clock,
{
    config: BenchConfig,
    advisor: A,
    clock: C,
}

impl BenchmarkRunner<SystemCoreAdvisor, SystemClock> {
    /// Creates a runner with the OS affinity facility and the system clock.
    pub fn system(config: BenchConfig) -> Self {
        Self::new(config, SystemCoreAdvisor::new(), SystemClock)
    }
}

impl<A, C> BenchmarkRunner<A, C>
where
    A: CoreAdvisor,
    C: Clock,
{
    /// Creates a runner with an explicit advisor and clock.
    pub fn new(config: BenchConfig, advisor: A, clock: C) -> Self {
        Self {
            config,
            advisor,
            clock,
        }
    }

    /// Returns the configuration this runner was built with.
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Runs the full sweep: every configured thread count, in order.
    ///
    /// Each thread count's outcome is both pushed to `sink` and collected
    /// into the returned report. A failing thread count is reported and
    /// skipped; it never aborts the remaining configurations.
    pub fn run_all<W>(&self, workload: &W, sink: &mut dyn ReportSink) -> BenchmarkReport
    where
        W: Workload + ?Sized,
    {
        let workload_name = workload.name();
        tracing::info!(workload = %workload_name, "starting scaling sweep");

        let mut report = BenchmarkReport::new(self.config.name(), &workload_name);
        for &threads in self.config.thread_counts() {
            match self.run_benchmark(workload, threads) {
                Ok(avg) => {
                    tracing::info!(threads, avg_ms = avg.as_millis() as u64, "thread count done");
                    sink.on_result(threads, avg);
                    report.add_measured(threads, avg);
                }
                Err(err) => {
                    tracing::error!(threads, %err, "thread count failed");
                    sink.on_error(threads, &err);
                    report.add_failed(threads, err.to_string());
                }
            }
        }
        report
    }

    /// Benchmarks one thread count: warm-up trials (discarded), then
    /// measured trials, then the arithmetic mean of the measured durations.
    ///
    /// With zero measured runs the result is `Duration::ZERO`; warm-up
    /// trials still execute.
    ///
    /// `threads` must be at least 1: zero workers would time an empty round
    /// and report a meaningless near-zero average.
    pub fn run_benchmark<W>(&self, workload: &W, threads: usize) -> Result<Duration, BenchError>
    where
        W: Workload + ?Sized,
    {
        if threads == 0 {
            return Err(BenchError::Trial("thread count must be >= 1".to_string()));
        }

        for _ in 0..self.config.warmup_runs() {
            self.run_once(workload, threads)?;
        }

        let mut trials = Vec::with_capacity(self.config.measured_runs());
        for trial_index in 0..self.config.measured_runs() {
            let duration = self.run_once(workload, threads)?;
            tracing::debug!(
                threads,
                trial_index,
                duration_ms = duration.as_millis() as u64,
                "measured trial complete"
            );
            trials.push(TrialRecord {
                trial_index,
                duration,
            });
        }

        if trials.is_empty() {
            return Ok(Duration::ZERO);
        }
        let total: Duration = trials.iter().map(|t| t.duration).sum();
        Ok(total / trials.len() as u32)
    }

    /// Executes one trial: a fresh pool of exactly `threads` workers, each
    /// pinning itself (best effort) and invoking the workload once.
    ///
    /// The end timestamp is taken after the scope exits, i.e. after every
    /// worker has been joined and the pool is fully torn down. If any
    /// worker fails, the trial fails and completed workers' checksums are
    /// discarded.
    fn run_once<W>(&self, workload: &W, threads: usize) -> Result<Duration, BenchError>
    where
        W: Workload + ?Sized,
    {
        let advisor = &self.advisor;
        let cores = advisor.available_cores().max(1);

        let start = self.clock.now();
        let joined: Result<u64, BenchError> = std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(threads);
            let mut spawn_error = None;
            for worker_id in 0..threads {
                let spawned = std::thread::Builder::new()
                    .name(format!("bench-worker-{worker_id}"))
                    .spawn_scoped(scope, move || {
                        // One diagnostic per trial; the other workers would
                        // only repeat it.
                        match advisor.pin_current_thread(worker_id % cores) {
                            Ok(()) if worker_id == 0 => {
                                tracing::trace!(core = ?advisor.current_core(), "worker pinned");
                            }
                            Err(err) if worker_id == 0 => {
                                tracing::warn!(%err, "running unpinned");
                            }
                            _ => {}
                        }
                        workload.compute()
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        spawn_error = Some(BenchError::Trial(format!(
                            "failed to spawn worker {worker_id}: {err}"
                        )));
                        break;
                    }
                }
            }

            // Join every spawned worker before inspecting any outcome. A
            // panicked handle must be consumed here; leaving it for the
            // scope's implicit join would re-raise the panic and abort the
            // sweep instead of failing the trial.
            let results: Vec<std::thread::Result<_>> =
                handles.into_iter().map(|handle| handle.join()).collect();

            if let Some(err) = spawn_error {
                return Err(err);
            }
            let mut checksum = 0u64;
            for (worker_id, result) in results.into_iter().enumerate() {
                let result = result
                    .map_err(|_| BenchError::Trial(format!("worker {worker_id} panicked")))?;
                checksum = checksum.wrapping_add(result?);
            }
            Ok(checksum)
        });

        let checksum = joined?;
        std::hint::black_box(checksum);

        Ok(self.clock.now().duration_since(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NullSink;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Instant;
    use threadbench_affinity::AffinityError;
    use threadbench_core::WorkloadError;

    /// Clock that replays a programmed list of instants.
    ///
    /// `with_trial_durations` programs one start/end pair per expected
    /// trial, which is exactly two `now()` calls per `run_once`.
    struct FakeClock {
        base: Instant,
        offsets: Mutex<std::vec::IntoIter<Duration>>,
    }

    impl FakeClock {
        fn with_trial_durations(durations_ms: &[u64]) -> Self {
            let mut offsets = Vec::with_capacity(durations_ms.len() * 2);
            let mut elapsed = Duration::ZERO;
            for &ms in durations_ms {
                offsets.push(elapsed);
                elapsed += Duration::from_millis(ms);
                offsets.push(elapsed);
            }
            Self {
                base: Instant::now(),
                offsets: Mutex::new(offsets.into_iter()),
            }
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> Instant {
            let offset = self
                .offsets
                .lock()
                .unwrap()
                .next()
                .expect("fake clock ran out of programmed instants");
            self.base + offset
        }
    }

    /// Advisor that records every pin request it receives.
    struct RecordingAdvisor {
        cores: usize,
        requests: Mutex<Vec<usize>>,
        fail_all: bool,
    }

    impl RecordingAdvisor {
        fn new(cores: usize) -> Self {
            Self {
                cores,
                requests: Mutex::new(Vec::new()),
                fail_all: false,
            }
        }

        fn failing(cores: usize) -> Self {
            Self {
                fail_all: true,
                ..Self::new(cores)
            }
        }

        fn requests(&self) -> Vec<usize> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl CoreAdvisor for RecordingAdvisor {
        fn available_cores(&self) -> usize {
            self.cores
        }

        fn pin_current_thread(&self, core: usize) -> Result<(), AffinityError> {
            self.requests.lock().unwrap().push(core);
            if self.fail_all {
                Err(AffinityError::Unsupported)
            } else {
                Ok(())
            }
        }
    }

    /// Workload that counts invocations and optionally fails the n-th one.
    struct CountingWorkload {
        calls: AtomicUsize,
        fail_on_call: Option<usize>,
    }

    impl CountingWorkload {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on_call: None,
            }
        }

        fn failing_on_call(n: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on_call: Some(n),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Workload for CountingWorkload {
        fn name(&self) -> String {
            "counting workload".to_string()
        }

        fn compute(&self) -> Result<u64, WorkloadError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_call == Some(call) {
                return Err(WorkloadError::Failed(format!("injected failure on call {call}")));
            }
            Ok(call as u64 + 1)
        }
    }

    fn config(threads: Vec<usize>, warmup: usize, measured: usize) -> BenchConfig {
        BenchConfig::new("runner tests")
            .with_thread_counts(threads)
            .with_warmup_runs(warmup)
            .with_measured_runs(measured)
    }

    #[test]
    fn average_is_arithmetic_mean_of_measured_trials() {
        let clock = FakeClock::with_trial_durations(&[100, 200, 300]);
        let runner = BenchmarkRunner::new(config(vec![2], 0, 3), RecordingAdvisor::new(8), clock);
        let workload = CountingWorkload::new();

        let avg = runner.run_benchmark(&workload, 2).unwrap();
        assert_eq!(avg, Duration::from_millis(200));
    }

    #[test]
    fn zero_measured_runs_reports_zero_without_measuring() {
        let clock = FakeClock::with_trial_durations(&[50, 50]); // warm-ups only
        let runner = BenchmarkRunner::new(config(vec![3], 2, 0), RecordingAdvisor::new(8), clock);
        let workload = CountingWorkload::new();

        let avg = runner.run_benchmark(&workload, 3).unwrap();
        assert_eq!(avg, Duration::ZERO);
        // Warm-up trials still ran: 2 trials x 3 workers.
        assert_eq!(workload.calls(), 6);
    }

    #[test]
    fn warmup_trials_never_influence_the_average() {
        let without_warmup = {
            let clock = FakeClock::with_trial_durations(&[120, 180]);
            let runner =
                BenchmarkRunner::new(config(vec![2], 0, 2), RecordingAdvisor::new(8), clock);
            runner.run_benchmark(&CountingWorkload::new(), 2).unwrap()
        };
        let with_warmup = {
            // Warm-up trials get wildly different durations; they must not
            // show up in the average.
            let clock = FakeClock::with_trial_durations(&[9999, 1, 9999, 1, 9999, 120, 180]);
            let runner =
                BenchmarkRunner::new(config(vec![2], 5, 2), RecordingAdvisor::new(8), clock);
            runner.run_benchmark(&CountingWorkload::new(), 2).unwrap()
        };
        assert_eq!(without_warmup, with_warmup);
        assert_eq!(with_warmup, Duration::from_millis(150));
    }

    #[test]
    fn each_trial_dispatches_exactly_thread_count_workers_once() {
        let clock = FakeClock::with_trial_durations(&[10]);
        let advisor = RecordingAdvisor::new(16);
        let runner = BenchmarkRunner::new(config(vec![4], 0, 1), advisor, clock);
        let workload = CountingWorkload::new();

        runner.run_benchmark(&workload, 4).unwrap();

        // Each worker computed exactly once.
        assert_eq!(workload.calls(), 4);
        // With 16 cores available, worker_id % cores == worker_id, so the
        // pin requests expose the worker ids: 0..4, each exactly once.
        let mut requests = runner.advisor.requests();
        requests.sort_unstable();
        assert_eq!(requests, vec![0, 1, 2, 3]);
    }

    #[test]
    fn worker_ids_wrap_around_available_cores() {
        let clock = FakeClock::with_trial_durations(&[10]);
        let advisor = RecordingAdvisor::new(2);
        let runner = BenchmarkRunner::new(config(vec![5], 0, 1), advisor, clock);

        runner.run_benchmark(&CountingWorkload::new(), 5).unwrap();

        let mut requests = runner.advisor.requests();
        requests.sort_unstable();
        assert_eq!(requests, vec![0, 0, 0, 1, 1]);
    }

    #[test]
    fn computation_error_fails_the_thread_count_and_skips_later_trials() {
        let clock = FakeClock::with_trial_durations(&[10, 10, 10]);
        let runner = BenchmarkRunner::new(config(vec![2], 0, 3), RecordingAdvisor::new(8), clock);
        // Fails during the first trial (call index 1 is one of its workers).
        let workload = CountingWorkload::failing_on_call(1);

        let err = runner.run_benchmark(&workload, 2).unwrap_err();
        assert!(matches!(err, BenchError::Workload(_)));
        // Later trials never started: only the first trial's workers ran.
        assert!(workload.calls() <= 2);
    }

    #[test]
    fn run_all_continues_past_a_failing_thread_count() {
        let clock = FakeClock::with_trial_durations(&[10, 10, 10]);
        let runner =
            BenchmarkRunner::new(config(vec![1, 2, 1], 0, 1), RecordingAdvisor::new(8), clock);
        // First call belongs to the threads=1 entry; the failure lands in
        // the threads=2 entry (calls 1 and 2), and threads=1 runs again.
        let workload = CountingWorkload::failing_on_call(1);

        let report = runner.run_all(&workload, &mut NullSink);

        assert_eq!(report.measurements.len(), 3);
        assert!(report.measurements[0].avg_duration().is_some());
        assert!(report.measurements[1].avg_duration().is_none());
        assert!(report.measurements[2].avg_duration().is_some());
        assert!(report.has_failures());
    }

    #[test]
    fn affinity_failures_do_not_change_the_reported_average() {
        let pinned = {
            let clock = FakeClock::with_trial_durations(&[100, 200]);
            let runner =
                BenchmarkRunner::new(config(vec![2], 0, 2), RecordingAdvisor::new(8), clock);
            runner.run_benchmark(&CountingWorkload::new(), 2).unwrap()
        };
        let unpinned = {
            let clock = FakeClock::with_trial_durations(&[100, 200]);
            let runner =
                BenchmarkRunner::new(config(vec![2], 0, 2), RecordingAdvisor::failing(8), clock);
            runner.run_benchmark(&CountingWorkload::new(), 2).unwrap()
        };
        assert_eq!(pinned, unpinned);
        assert_eq!(pinned, Duration::from_millis(150));
    }

    struct PanickingWorkload;

    impl Workload for PanickingWorkload {
        fn name(&self) -> String {
            "panicking workload".to_string()
        }
        fn compute(&self) -> Result<u64, WorkloadError> {
            panic!("boom");
        }
    }

    #[test]
    fn panicking_workload_surfaces_as_trial_error() {
        let clock = FakeClock::with_trial_durations(&[10]);
        let runner = BenchmarkRunner::new(config(vec![1], 0, 1), RecordingAdvisor::new(8), clock);

        let err = runner.run_benchmark(&PanickingWorkload, 1).unwrap_err();
        assert!(matches!(err, BenchError::Trial(_)));
    }

    #[test]
    fn multiple_panicking_workers_still_fail_as_trial_error() {
        // With every worker in the trial panicking, each panicked handle
        // must be consumed by the runner's own join; an unjoined one would
        // re-raise at scope exit and unwind through run_benchmark.
        let clock = FakeClock::with_trial_durations(&[10]);
        let runner = BenchmarkRunner::new(config(vec![4], 0, 1), RecordingAdvisor::new(8), clock);

        let err = runner.run_benchmark(&PanickingWorkload, 4).unwrap_err();
        assert!(matches!(err, BenchError::Trial(_)));
    }

    #[test]
    fn zero_thread_count_fails_instead_of_timing_an_empty_round() {
        let clock = FakeClock::with_trial_durations(&[]);
        let runner = BenchmarkRunner::new(config(vec![1], 0, 1), RecordingAdvisor::new(8), clock);
        let workload = CountingWorkload::new();

        let err = runner.run_benchmark(&workload, 0).unwrap_err();
        assert!(matches!(err, BenchError::Trial(_)));
        assert_eq!(workload.calls(), 0);
    }

    #[test]
    fn run_all_reports_a_builder_supplied_zero_thread_count_as_error() {
        // `with_thread_counts` is not validated; the runner still refuses
        // the entry and the sweep carries on with the rest.
        let clock = FakeClock::with_trial_durations(&[10]);
        let runner =
            BenchmarkRunner::new(config(vec![0, 1], 0, 1), RecordingAdvisor::new(8), clock);

        let report = runner.run_all(&CountingWorkload::new(), &mut NullSink);

        assert_eq!(report.measurements.len(), 2);
        assert!(report.measurements[0].avg_duration().is_none());
        assert!(report.measurements[1].avg_duration().is_some());
    }
}
