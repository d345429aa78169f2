//! The submit state machine (component C4): probe, accept or reject, with
//! the "was previously over" edge that selects entry penalty vs. overhead
//! penalty.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};
use crate::config::{Derived, LimiterConfig};
use crate::error::Result;
use crate::penalty::distribute_penalty;
use crate::snapshot::Snapshot;
use crate::tta::compute_tta;
use crate::window::Window;

/// Outcome of a [`Limiter::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmitOutcome {
    /// Whether the load was admitted.
    pub accepted: bool,
    /// Lower-bound estimate of seconds until an equivalent request would be
    /// admitted, if the limiter was configured to compute it and one could
    /// be computed.
    pub retry_in: Option<f64>,
}

/// Mutable state protected by the limiter's single mutex.
pub(crate) struct LimiterState {
    pub window: Window,
    pub was_over: bool,
    pub num_calls: u64,
    pub total_overhead: Duration,
}

impl LimiterState {
    fn new() -> Self {
        Self {
            window: Window::new(),
            was_over: false,
            num_calls: 0,
            total_overhead: Duration::ZERO,
        }
    }
}

/// A sliding-window load limiter.
///
/// Construct with [`Limiter::new`]; all public operations acquire the
/// limiter's internal lock for their full duration and never suspend while
/// holding it.
pub struct Limiter {
    pub(crate) config: LimiterConfig,
    pub(crate) derived: Derived,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) state: Mutex<LimiterState>,
}

impl Limiter {
    /// Builds a limiter backed by the system clock.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::InvalidConfig`] if `config` violates
    /// any of its documented constraints. No partial limiter is produced.
    pub fn new(config: LimiterConfig) -> Result<Self> {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Builds a limiter backed by an arbitrary [`Clock`] (used in tests with
    /// [`crate::clock::FrozenClock`]).
    pub fn with_clock(config: LimiterConfig, clock: Box<dyn Clock>) -> Result<Self> {
        let derived = config.validate()?;
        Ok(Self {
            config,
            derived,
            clock,
            state: Mutex::new(LimiterState::new()),
        })
    }

    /// The configured name, if any.
    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    /// Admission ceiling over `period`.
    pub fn maxload(&self) -> f64 {
        self.config.maxload
    }

    /// Window length in seconds.
    pub fn period(&self) -> u64 {
        self.config.period
    }

    /// Current `window_total`.
    pub fn window_total(&self) -> f64 {
        self.state.lock().unwrap().window.window_total
    }

    /// Number of `submit` calls observed so far.
    pub fn num_calls(&self) -> u64 {
        self.state.lock().unwrap().num_calls
    }

    /// Cumulative time spent in the accounting hot path (probe + accept/reject).
    pub fn total_overhead(&self) -> Duration {
        self.state.lock().unwrap().total_overhead
    }

    /// `window_total / maxload`, or `0` if the window is empty.
    pub fn instant_load_factor(&self) -> f64 {
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap();
        state
            .window
            .advance(now, self.derived.step_period, self.config.period as i64);
        if state.window.window_total == 0.0 {
            0.0
        } else {
            state.window.window_total / self.config.maxload
        }
    }

    /// Attempts to admit `load` (must be `>= 0`).
    pub fn submit(&self, load: f64) -> SubmitOutcome {
        debug_assert!(load >= 0.0, "load must not be negative");
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap();
        Self::submit_locked(&self.config, &self.derived, &mut state, now, load)
    }

    /// Injects `amount` of synthetic load, spread across the whole window.
    /// Used by hosts to warm up a limiter or throttle out-of-band.
    pub fn distribute(&self, amount: f64) {
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap();
        state
            .window
            .advance(now, self.derived.step_period, self.config.period as i64);
        distribute_penalty(
            &mut state.window,
            amount,
            1.0,
            self.derived.step_period,
            self.derived.num_max_buckets,
            self.derived.max_cap,
        );
    }

    /// Captures the current state for later restoration.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.lock().unwrap();
        Snapshot::capture(&self.config, &self.derived, &state)
    }

    /// Restores state previously captured by [`Limiter::snapshot`].
    ///
    /// # Errors
    /// Returns [`crate::error::Error::InvalidConfig`] if the snapshot's
    /// configuration digest does not match this limiter's configuration.
    pub fn restore(&self, snapshot: Snapshot) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        snapshot.apply(&self.config, &self.derived, &mut state)
    }

    // -- internals shared with the composite coordinator (C5) --

    /// Advances the window to `now` and checks whether `window_total + load`
    /// would fit under `maxload`. Part of step 1 of `submit`.
    pub(crate) fn probe_locked(
        config: &LimiterConfig,
        derived: &Derived,
        state: &mut LimiterState,
        now: f64,
        load: f64,
    ) -> bool {
        let t0 = Instant::now();
        state.num_calls += 1;
        state.window.advance(now, derived.step_period, config.period as i64);
        let would_be = state.window.window_total + load;
        let passed = would_be <= config.maxload;
        state.total_overhead += t0.elapsed();
        passed
    }

    /// Commits an accepted `load` to the current bucket and the running total.
    pub(crate) fn accept_locked(derived: &Derived, state: &mut LimiterState, load: f64) -> SubmitOutcome {
        let t0 = Instant::now();
        state.was_over = false;
        state.window.window_total += load;
        if let Some(bucket) = state.window.buckets.back_mut() {
            bucket.load += load;
        }
        if state.window.window_total > derived.max_cap {
            state.window.trim_from_oldest(derived.max_cap);
        }
        state.total_overhead += t0.elapsed();
        SubmitOutcome {
            accepted: true,
            retry_in: None,
        }
    }

    /// Applies reject-branch bookkeeping: drift correction, entry/overhead
    /// penalty, `was_over` edge, and (optionally) the TTA estimate.
    pub(crate) fn reject_locked(
        config: &LimiterConfig,
        derived: &Derived,
        state: &mut LimiterState,
        now: f64,
        load: f64,
    ) -> SubmitOutcome {
        let t0 = Instant::now();

        if state.window.window_total > derived.max_cap {
            state.window.trim_from_oldest(derived.max_cap);
        }

        if !state.was_over {
            state.window.correct_drift_ascending();
            if derived.entry_penalty > 0 {
                distribute_penalty(
                    &mut state.window,
                    derived.entry_penalty as f64,
                    config.penalty_distribution_factor,
                    derived.step_period,
                    derived.num_max_buckets,
                    derived.max_cap,
                );
            }
        } else if config.request_overhead_penalty_factor > 0.0 {
            let overhead = load * config.request_overhead_penalty_factor;
            if overhead > 0.0 {
                distribute_penalty(
                    &mut state.window,
                    overhead,
                    config.request_overhead_penalty_distribution_factor,
                    derived.step_period,
                    derived.num_max_buckets,
                    derived.max_cap,
                );
            }
        }

        state.was_over = true;

        let retry_in = if config.compute_tta {
            compute_tta(&state.window, load, config.maxload, config.period as i64, now)
        } else {
            None
        };

        state.total_overhead += t0.elapsed();
        SubmitOutcome {
            accepted: false,
            retry_in,
        }
    }

    fn submit_locked(
        config: &LimiterConfig,
        derived: &Derived,
        state: &mut LimiterState,
        now: f64,
        load: f64,
    ) -> SubmitOutcome {
        if load == 0.0 {
            state
                .window
                .advance(now, derived.step_period, config.period as i64);
            return SubmitOutcome {
                accepted: true,
                retry_in: None,
            };
        }

        if Self::probe_locked(config, derived, state, now, load) {
            Self::accept_locked(derived, state, load)
        } else {
            Self::reject_locked(config, derived, state, now, load)
        }
    }
}
