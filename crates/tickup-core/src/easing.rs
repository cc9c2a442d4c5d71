//! Easing function for counter animations
//!
//! A single fixed curve: cubic ease-out. Fast initial motion that decelerates
//! into the target reads better on counters than a linear sweep, and the
//! derivative vanishing at t=1 means the last frames settle visibly.

/// Cubic ease-out: f(t) = 1 - (1-t)³
///
/// Input is clamped to [0, 1]; output is in [0, 1] with f(0) = 0 and f(1) = 1.
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}
