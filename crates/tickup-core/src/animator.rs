//! Animated value state machine
//!
//! [`AnimatedValue`] smooths a displayed counter toward a changing target.
//! Each target change starts a fresh interpolation session from the value
//! currently on screen, so mid-flight retargets are continuous rather than
//! jumping back to the old target.
//!
//! The struct is driven from outside: [`set_target`] returns the token of the
//! session that needs frames, and the driver calls [`tick`] with that token
//! and the frame timestamp until no further token is returned. A tick carrying
//! a token from a cancelled session is a guaranteed no-op, which makes frame
//! callbacks that race a retarget harmless.
//!
//! States are `Idle` (no session) and `Animating` (one live session). A
//! retarget while animating stays in `Animating` with a new session; disposal
//! is terminal.
//!
//! [`set_target`]: AnimatedValue::set_target
//! [`tick`]: AnimatedValue::tick

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::trace;

use crate::clock::Clock;
use crate::easing::ease_out_cubic;
use crate::timing::{lerp_floor, progress};
use crate::value::coerce;

/// Fixed duration of one interpolation session.
///
/// Deliberately not configurable; counters all settle at the same pace.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(1000);

/// Identity of one interpolation session.
///
/// Tokens increase monotonically per [`AnimatedValue`]; a token from a
/// superseded session never matches the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(u64);

/// One interpolation run from a captured start value to a captured end value.
#[derive(Debug, Clone)]
struct Session {
    token: SessionToken,
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
}

/// Smoothed display value tracking an upstream numeric target.
pub struct AnimatedValue {
    display: f64,
    session: Option<Session>,
    last_token: u64,
    disposed: bool,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for AnimatedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedValue")
            .field("display", &self.display)
            .field("animating", &self.session.is_some())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl AnimatedValue {
    /// Create a binder showing the coerced initial value.
    ///
    /// The first observation of the source is applied synchronously: no
    /// session is created and no frame is needed before `display()` reads
    /// the initial value.
    pub fn new(initial: &Value, clock: Arc<dyn Clock>) -> Self {
        Self {
            display: coerce(initial),
            session: None,
            last_token: 0,
            disposed: false,
            clock,
        }
    }

    /// The value currently on screen.
    ///
    /// Either a finalized target or the most recently interpolated frame.
    #[inline]
    pub fn display(&self) -> f64 {
        self.display
    }

    /// The value the display is heading toward.
    pub fn target(&self) -> f64 {
        self.session.as_ref().map(|s| s.to).unwrap_or(self.display)
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.session.is_some()
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Handle a change of the upstream target.
    ///
    /// Cancels any in-flight session, then starts a new one from the current
    /// display value toward the coerced new target. Returns the token the
    /// driver must schedule a frame for, or `None` when the target equals the
    /// display (direct set, no frames) or the binder is disposed.
    pub fn set_target(&mut self, value: &Value) -> Option<SessionToken> {
        if self.disposed {
            return None;
        }

        // Invalidate the previous session before reading the display, so a
        // retarget continues from wherever the screen currently is.
        self.session = None;

        let to = coerce(value);
        let from = self.display;
        if from == to {
            self.display = to;
            return None;
        }

        self.last_token += 1;
        let token = SessionToken(self.last_token);
        trace!(from, to, ?token, "starting animation session");
        self.session = Some(Session {
            token,
            from,
            to,
            start: self.clock.now(),
            duration: ANIMATION_DURATION,
        });
        Some(token)
    }

    /// Advance the session identified by `token` to `frame_time`.
    ///
    /// Returns the token to schedule the next frame for, or `None` when the
    /// session completed. Ticks for a retired or superseded session are
    /// silent no-ops, as are ticks after disposal.
    pub fn tick(&mut self, token: SessionToken, frame_time: Instant) -> Option<SessionToken> {
        if self.disposed {
            return None;
        }
        let session = match self.session.as_ref() {
            Some(s) if s.token == token => s,
            _ => return None, // stale callback
        };

        let t = progress(session.start, frame_time, session.duration);
        if t < 1.0 {
            self.display = lerp_floor(session.from, session.to, ease_out_cubic(t));
            Some(token)
        } else {
            // Write the end value exactly; flooring the eased interpolation
            // would leave a residual off-by-one on the final frame.
            self.display = session.to;
            trace!(value = self.display, ?token, "animation session complete");
            self.session = None;
            None
        }
    }

    /// Tear the binder down.
    ///
    /// Cancels any live session; all later `set_target` and `tick` calls are
    /// no-ops. Idempotent.
    pub fn dispose(&mut self) {
        self.session = None;
        self.disposed = true;
    }
}
