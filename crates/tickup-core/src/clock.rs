//! Monotonic clock capability
//!
//! The animator never calls a global time source directly. It samples an
//! injected [`Clock`], which keeps sessions deterministic under test and lets
//! the tokio binder participate in paused test time.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// High-resolution, strictly non-decreasing timestamp source.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock monotonic time via `std::time::Instant`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Tokio-driven monotonic time.
///
/// Equal to [`MonotonicClock`] at runtime, but respects `tokio::time::pause`
/// and `tokio::time::advance`, so binder tasks can be fast-forwarded in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Fast-forwardable clock for deterministic tests and headless simulations.
///
/// Starts at an arbitrary base instant and only moves when [`advance`] is
/// called. Clones share the same timeline.
///
/// [`advance`]: ManualClock::advance
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move the clock forward by `d`.
    pub fn advance(&self, d: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += d;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        self.base + *offset
    }
}
