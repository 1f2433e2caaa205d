//! Clock abstraction for trial timing.

use std::time::Instant;

/// Source of timestamps for trial timing.
///
/// The runner takes its start/end timestamps through this trait so tests
/// can substitute a deterministic fake. Production code uses
/// [`SystemClock`].
pub trait Clock: Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
