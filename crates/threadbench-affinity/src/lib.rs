//! Best-effort CPU core pinning for benchmark workers.
//!
//! Pinning a worker thread to one logical core avoids scheduler migration
//! noise while a trial runs. It is strictly advisory: the OS may ignore or
//! override the request, and the benchmark stays valid either way. The
//! executor consumes the facility only through the [`CoreAdvisor`] trait, so
//! tests can substitute a fake and unsupported platforms fall back to
//! [`UnpinnedAdvisor`].

use thiserror::Error;

/// Error raised by a pin request.
///
/// Callers are expected to recover: both variants mean "run unpinned", never
/// "abort the benchmark".
#[derive(Debug, Error)]
pub enum AffinityError {
    /// The platform or environment has no usable pinning facility.
    #[error("CPU affinity is not supported on this platform")]
    Unsupported,

    /// The facility exists but rejected this specific request.
    #[error("CPU affinity request failed: {0}")]
    RequestFailed(String),
}

/// Advises the OS on thread-to-core placement.
///
/// All methods are callable from any worker thread and must not block.
pub trait CoreAdvisor: Sync {
    /// Number of logical cores pin requests are resolved against.
    /// Always at least 1.
    fn available_cores(&self) -> usize;

    /// Requests that the calling thread be constrained to the given
    /// logical core. Best effort; a failure means the thread simply keeps
    /// running wherever the scheduler puts it.
    fn pin_current_thread(&self, core: usize) -> Result<(), AffinityError>;

    /// The logical core the calling thread is presently executing on, if
    /// the platform can tell. Diagnostics only.
    fn current_core(&self) -> Option<usize> {
        None
    }
}

/// Advisor backed by the operating system's affinity facility.
///
/// Core ids are enumerated once at construction; pin requests index into
/// that snapshot.
pub struct SystemCoreAdvisor {
    core_ids: Vec<core_affinity::CoreId>,
}

impl SystemCoreAdvisor {
    pub fn new() -> Self {
        let core_ids = core_affinity::get_core_ids().unwrap_or_default();
        if core_ids.is_empty() {
            tracing::debug!("no pinnable cores enumerated; pin requests will fail");
        }
        Self { core_ids }
    }
}

impl Default for SystemCoreAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreAdvisor for SystemCoreAdvisor {
    fn available_cores(&self) -> usize {
        if self.core_ids.is_empty() {
            // Fall back to the scheduler's view so worker-to-core math
            // stays well defined even when enumeration failed.
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1)
        } else {
            self.core_ids.len()
        }
    }

    fn pin_current_thread(&self, core: usize) -> Result<(), AffinityError> {
        if self.core_ids.is_empty() {
            return Err(AffinityError::Unsupported);
        }
        let id = self.core_ids.get(core).ok_or_else(|| {
            AffinityError::RequestFailed(format!(
                "core index {core} out of range (system has {} cores)",
                self.core_ids.len()
            ))
        })?;
        if core_affinity::set_for_current(*id) {
            tracing::trace!(core, "pinned worker thread");
            Ok(())
        } else {
            Err(AffinityError::RequestFailed(format!(
                "OS rejected pin request for core {core}"
            )))
        }
    }

    fn current_core(&self) -> Option<usize> {
        current_core_raw()
    }
}

#[cfg(target_os = "linux")]
fn current_core_raw() -> Option<usize> {
    // SAFETY: sched_getcpu takes no arguments and only reads kernel state.
    let cpu = unsafe { libc::sched_getcpu() };
    usize::try_from(cpu).ok()
}

#[cfg(not(target_os = "linux"))]
fn current_core_raw() -> Option<usize> {
    None
}

/// Advisor for platforms without a pinning facility.
///
/// Reports the scheduler's core count but fails every pin request, which is
/// exactly what the executor has to tolerate: workers run wherever the OS
/// schedules them and timings remain valid.
pub struct UnpinnedAdvisor;

impl CoreAdvisor for UnpinnedAdvisor {
    fn available_cores(&self) -> usize {
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)
    }

    fn pin_current_thread(&self, _core: usize) -> Result<(), AffinityError> {
        Err(AffinityError::Unsupported)
    }
}
