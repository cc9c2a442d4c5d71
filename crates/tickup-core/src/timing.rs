//! Time calculation utilities for animations
//!
//! Pure functions over explicit timestamps. The sample time is always passed
//! in rather than read from a global clock, so sessions can be driven by a
//! fast-forwardable clock in tests and headless simulations.

use std::time::{Duration, Instant};

/// Calculate animation progress from start time, sample time and duration.
///
/// Returns a value clamped to [0.0, 1.0]. A zero duration is already complete.
#[inline]
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Linear interpolation between two values.
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Floored linear interpolation, for integer counter display.
///
/// Flooring rounds toward the start side on both increasing and decreasing
/// transitions, so a decreasing transition sits one unit below where a
/// ceiling-based interpolation would near completion. Callers that need the
/// exact endpoint must write it explicitly once progress reaches 1.
#[inline]
pub fn lerp_floor(from: f64, to: f64, t: f64) -> f64 {
    lerp(from, to, t).floor()
}
