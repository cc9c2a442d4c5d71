//! Binder task connecting a reactive source to an animated display value
//!
//! [`AnimatedBinder::spawn`] ties three watch channels together on one tokio
//! task: an upstream target source, the downstream display value, and a
//! shutdown signal held by the returned [`BinderHandle`]. All animator
//! mutation happens on that single task, so cancellation of a session and
//! scheduling of the next frame are never concurrent; a frame that was already
//! queued when a retarget landed is rejected by the session-token check in
//! [`AnimatedValue::tick`].
//!
//! Frames come from a fixed-interval `tokio::time::interval`, armed only while
//! a session is in flight. Progress is measured against the sampled clock, not
//! the frame count, so a throttled loop still converges on the exact target.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::animator::{AnimatedValue, SessionToken};
use crate::clock::{Clock, TokioClock};
use crate::config::AnimationConfig;

/// Spawns binder tasks.
pub struct AnimatedBinder;

impl AnimatedBinder {
    /// Spawn a binder for `source` with the default clock and frame rate.
    ///
    /// The initial source value is applied synchronously before the task
    /// starts: the returned display receiver already holds the coerced
    /// initial value, with no frame spent on it.
    pub fn spawn(source: watch::Receiver<Value>) -> (watch::Receiver<f64>, BinderHandle) {
        Self::spawn_with(
            source,
            Arc::new(TokioClock),
            AnimationConfig::default().frame_period(),
        )
    }

    /// Spawn a binder with an explicit clock and frame period.
    pub fn spawn_with(
        mut source: watch::Receiver<Value>,
        clock: Arc<dyn Clock>,
        frame_period: Duration,
    ) -> (watch::Receiver<f64>, BinderHandle) {
        let initial = source.borrow_and_update().clone();
        let animated = AnimatedValue::new(&initial, Arc::clone(&clock));
        let (display_tx, display_rx) = watch::channel(animated.display());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let frame_period = frame_period.max(Duration::from_millis(1));
        let task = tokio::spawn(run(
            animated,
            clock,
            source,
            display_tx,
            shutdown_rx,
            frame_period,
        ));

        (
            display_rx,
            BinderHandle {
                shutdown: shutdown_tx,
                task: Some(task),
            },
        )
    }
}

/// Teardown handle for a spawned binder.
///
/// Disposal happens at most once for the task: explicit [`dispose`] calls are
/// idempotent, and dropping the handle disposes as well, so a binder never
/// outlives the scope that owns its handle.
///
/// [`dispose`]: BinderHandle::dispose
pub struct BinderHandle {
    shutdown: watch::Sender<bool>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl BinderHandle {
    /// Signal the binder task to stop. Idempotent.
    pub fn dispose(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Whether disposal has been signalled.
    pub fn is_disposed(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Dispose and wait for the binder task to finish.
    pub async fn join(mut self) {
        self.dispose();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for BinderHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn run(
    mut animated: AnimatedValue,
    clock: Arc<dyn Clock>,
    mut source: watch::Receiver<Value>,
    display: watch::Sender<f64>,
    mut shutdown: watch::Receiver<bool>,
    frame_period: Duration,
) {
    let mut frames = tokio::time::interval(frame_period);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Token of the session the next frame belongs to, if one is in flight.
    let mut pending: Option<SessionToken> = None;
    let mut source_open = true;

    loop {
        tokio::select! {
            result = shutdown.changed() => {
                if result.is_err() || *shutdown.borrow() {
                    debug!("binder received shutdown signal");
                    break;
                }
            }

            result = source.changed(), if source_open => {
                match result {
                    Ok(()) => {
                        let target = source.borrow_and_update().clone();
                        pending = animated.set_target(&target);
                        if pending.is_some() {
                            // Restart the frame cadence for the new session.
                            frames.reset();
                        } else if !publish(&display, animated.display()) {
                            break;
                        }
                    }
                    Err(_) => {
                        // Source dropped; finish any in-flight session, then stop.
                        source_open = false;
                        if pending.is_none() {
                            break;
                        }
                    }
                }
            }

            _ = frames.tick(), if pending.is_some() => {
                if let Some(token) = pending {
                    pending = animated.tick(token, clock.now());
                    if !publish(&display, animated.display()) {
                        break;
                    }
                    if pending.is_none() && !source_open {
                        break;
                    }
                }
            }
        }
    }

    animated.dispose();
    debug!("binder task stopped");
}

/// Push a display value to consumers. Returns false when nobody is listening.
fn publish(display: &watch::Sender<f64>, value: f64) -> bool {
    if display.is_closed() {
        debug!("display receiver dropped, stopping binder");
        return false;
    }
    // Early frames can floor to the same value; skip no-op notifications.
    display.send_if_modified(|current| {
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn test_initial_value_applied_before_any_frame() {
        let (_tx, rx) = watch::channel(json!(42));
        let (display, handle) = AnimatedBinder::spawn(rx);
        assert_eq!(*display.borrow(), 42.0);
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_numeric_initial_value_is_zero() {
        let (_tx, rx) = watch::channel(json!("loading"));
        let (display, handle) = AnimatedBinder::spawn(rx);
        assert_eq!(*display.borrow(), 0.0);
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_converges_monotonically_to_target() {
        let (tx, rx) = watch::channel(json!(0));
        let (mut display, handle) = AnimatedBinder::spawn(rx);

        tx.send_replace(json!(1000));
        let mut prev = 0.0;
        loop {
            display.changed().await.unwrap();
            let v = *display.borrow();
            assert!(v >= prev, "display regressed: {} < {}", v, prev);
            assert!(v <= 1000.0, "display overshot: {}", v);
            prev = v;
            if v == 1000.0 {
                break;
            }
        }
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_equal_target_produces_no_frames() {
        let (tx, rx) = watch::channel(json!(7));
        let (mut display, _handle) = AnimatedBinder::spawn(rx);

        tx.send_replace(json!(7));
        let result = timeout(Duration::from_secs(3), display.changed()).await;
        assert!(result.is_err(), "display must not change");
        assert_eq!(*display.borrow(), 7.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retarget_mid_flight_lands_on_new_target() {
        let (tx, rx) = watch::channel(json!(0));
        let (mut display, handle) = AnimatedBinder::spawn(rx);

        tx.send_replace(json!(1000));
        // Let a few frames run, then retarget while the first session is live.
        for _ in 0..3 {
            display.changed().await.unwrap();
        }
        let mid = *display.borrow();
        assert!(mid > 0.0 && mid < 1000.0);

        tx.send_replace(json!(500));
        let mut last = mid;
        while last != 500.0 {
            display.changed().await.unwrap();
            last = *display.borrow();
        }
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_numeric_target_animates_to_zero() {
        let (tx, rx) = watch::channel(json!(42));
        let (mut display, handle) = AnimatedBinder::spawn(rx);

        tx.send_replace(json!("offline"));
        let mut last = 42.0;
        loop {
            display.changed().await.unwrap();
            let v = *display.borrow();
            assert!(v <= last, "display must descend: {} > {}", v, last);
            last = v;
            if v == 0.0 {
                break;
            }
        }
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_freezes_display() {
        let (tx, rx) = watch::channel(json!(0));
        let (mut display, handle) = AnimatedBinder::spawn(rx);

        tx.send_replace(json!(100));
        display.changed().await.unwrap();
        handle.join().await;
        let frozen = *display.borrow_and_update();

        // Source mutations after teardown reach nobody.
        tx.send_replace(json!(5000));
        assert!(display.changed().await.is_err(), "binder task must be gone");
        assert_eq!(*display.borrow(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_is_idempotent() {
        let (_tx, rx) = watch::channel(json!(1));
        let (_display, handle) = AnimatedBinder::spawn(rx);
        handle.dispose();
        handle.dispose();
        assert!(handle.is_disposed());
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_drop_finishes_in_flight_session() {
        let (tx, rx) = watch::channel(json!(0));
        let (mut display, _handle) = AnimatedBinder::spawn(rx);

        tx.send_replace(json!(100));
        drop(tx);

        let mut last = *display.borrow();
        while display.changed().await.is_ok() {
            last = *display.borrow();
        }
        assert_eq!(last, 100.0, "animation must still converge");
    }
}
