//! Two-phase commit across N limiters (component C5): admits a load iff
//! every child limiter would admit it.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::limiter::{Limiter, LimiterState, SubmitOutcome};

/// A meta-limiter that delegates to `N` child limiters and admits a request
/// iff all children would admit it.
///
/// Holds its own lock, then acquires each child's lock in fixed
/// (construction) order for the duration of the probe-then-commit critical
/// section. Safe and deadlock-free as long as no other composite shares
/// children with this one using a different acquisition order (see
/// crate-level concurrency notes).
pub struct CompositeLimiter {
    name: Option<String>,
    children: Vec<Arc<Limiter>>,
    lock: Mutex<()>,
}

impl CompositeLimiter {
    /// Builds a composite over `children`. Requires at least one child.
    pub fn new(name: impl Into<Option<String>>, children: Vec<Arc<Limiter>>) -> Result<Self> {
        if children.is_empty() {
            return Err(Error::InvalidConfig(
                "composite limiter requires at least one child".into(),
            ));
        }
        Ok(Self {
            name: name.into(),
            children,
            lock: Mutex::new(()),
        })
    }

    /// The configured name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The child limiters, in construction order.
    pub fn children(&self) -> &[Arc<Limiter>] {
        &self.children
    }

    /// Keeps the first child on a tie, matching the original construction
    /// order's tie-break rule (`candidate.period > widest.period`, strict).
    fn widest_child(&self) -> &Arc<Limiter> {
        self.children
            .iter()
            .fold(&self.children[0], |widest, c| {
                if c.period() > widest.period() {
                    c
                } else {
                    widest
                }
            })
    }

    /// Admission ceiling of the widest-period child, for dashboards.
    pub fn maxload(&self) -> f64 {
        self.widest_child().maxload()
    }

    /// Period of the widest-period child, for dashboards.
    pub fn period(&self) -> u64 {
        self.widest_child().period()
    }

    /// `window_total` of the widest-period child, for dashboards.
    pub fn window_total(&self) -> f64 {
        self.widest_child().window_total()
    }

    /// Probes every child, then commits all-or-nothing.
    pub fn submit(&self, load: f64) -> SubmitOutcome {
        let _composite_guard = self.lock.lock().unwrap();

        let mut guards: Vec<MutexGuard<'_, LimiterState>> =
            self.children.iter().map(|c| c.state.lock().unwrap()).collect();

        let passed: Vec<bool> = self
            .children
            .iter()
            .zip(guards.iter_mut())
            .map(|(child, state)| {
                let now = child.clock.now();
                Limiter::probe_locked(&child.config, &child.derived, state, now, load)
            })
            .collect();

        if passed.iter().all(|p| *p) {
            for (child, state) in self.children.iter().zip(guards.iter_mut()) {
                Limiter::accept_locked(&child.derived, state, load);
            }
            return SubmitOutcome {
                accepted: true,
                retry_in: None,
            };
        }

        let mut highest_retry: Option<f64> = None;
        for ((child, state), ok) in self.children.iter().zip(guards.iter_mut()).zip(passed.iter()) {
            if *ok {
                continue;
            }
            let now = child.clock.now();
            let outcome = Limiter::reject_locked(&child.config, &child.derived, state, now, load);
            if let Some(retry_in) = outcome.retry_in {
                highest_retry = Some(highest_retry.map_or(retry_in, |h: f64| h.max(retry_in)));
            }
        }

        SubmitOutcome {
            accepted: false,
            retry_in: highest_retry,
        }
    }

    /// `max(child.window_total / child.maxload)` across children.
    pub fn instant_load_factor(&self) -> f64 {
        let _guard = self.lock.lock().unwrap();
        self.children
            .iter()
            .map(|c| c.instant_load_factor())
            .fold(0.0_f64, f64::max)
    }

    /// Invokes each child's `distribute(amount)` in turn.
    pub fn distribute(&self, amount: f64) {
        let _guard = self.lock.lock().unwrap();
        for child in &self.children {
            child.distribute(amount);
        }
    }
}
