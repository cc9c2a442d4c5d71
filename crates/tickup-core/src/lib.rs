pub mod animator;
pub mod binder;
pub mod clock;
pub mod config;
pub mod easing;
pub mod error;
pub mod timing;
pub mod value;

pub use animator::{AnimatedValue, SessionToken, ANIMATION_DURATION};
pub use binder::{AnimatedBinder, BinderHandle};
pub use clock::{Clock, ManualClock, MonotonicClock, TokioClock};
pub use config::AppConfig;
pub use error::{Error, Result};
