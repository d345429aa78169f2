//! Time source abstraction for the limiter.
//!
//! The core accounting engine never reads the wall clock directly; it goes
//! through a [`Clock`] so tests can freeze and advance time deterministically
//! instead of sleeping on a real clock.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of "now", expressed as seconds since an arbitrary epoch.
///
/// Implementations only need to be monotonic enough for second-resolution
/// accounting; small backward jumps are tolerated by the window accounting
/// (see [`crate::window::Window::advance`]).
pub trait Clock: Send + Sync {
    /// Current time in seconds.
    fn now(&self) -> f64;
}

/// Production clock backed by [`SystemTime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before the Unix epoch")
            .as_secs_f64()
    }
}

/// A mockable clock for tests: holds a fixed instant until explicitly moved.
///
/// Mirrors the role `freezegun.freeze_time` plays in the original Python
/// test suite.
#[derive(Debug)]
pub struct FrozenClock {
    now: Mutex<f64>,
}

impl FrozenClock {
    /// Freezes the clock at `start` seconds.
    pub fn new(start: f64) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward by `delta` seconds (may be negative).
    pub fn advance(&self, delta: f64) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }

    /// Sets the clock to an absolute time.
    pub fn set(&self, t: f64) {
        *self.now.lock().unwrap() = t;
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> f64 {
        *self.now.lock().unwrap()
    }
}

/// Lets an `Arc<C>` stand in for `C` wherever a `Clock` is needed, so callers
/// can keep a handle to a clock (e.g. to advance a [`FrozenClock`] in tests)
/// after handing a clone to a [`crate::limiter::Limiter`].
impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }
}
