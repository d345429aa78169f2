//! The bucketed sliding window (component C1): the ring of time-aligned
//! buckets, its advance-to-now routine, and trim-from-oldest cap enforcement.

use std::collections::VecDeque;

/// A time-aligned bucket: a whole-second-aligned `start` and its accumulated
/// `load`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    /// Start time of the bucket, a multiple of `step_period`.
    pub start: i64,
    /// Non-negative accumulated load.
    pub load: f64,
}

/// Ordered bucket sequence plus its running total.
///
/// `window_total` tracks `Σ bucket.load` but is allowed to drift from it by
/// floating-point accumulation error; [`Window::correct_drift_ascending`]
/// recomputes it exactly, and [`Window::advance`] clamps away descending
/// drift on eviction.
#[derive(Debug, Clone)]
pub(crate) struct Window {
    pub buckets: VecDeque<Bucket>,
    pub window_total: f64,
}

impl Window {
    pub fn new() -> Self {
        Self {
            buckets: VecDeque::new(),
            window_total: 0.0,
        }
    }

    /// Idempotent synchronization to `now`: appends the current bucket if
    /// needed and evicts buckets fallen out of `period`.
    pub fn advance(&mut self, now: f64, step_period: i64, period: i64) {
        let t_start = ((now / step_period as f64).floor() as i64) * step_period;

        if self.buckets.back().map_or(true, |b| b.start != t_start) {
            self.buckets.push_back(Bucket {
                start: t_start,
                load: 0.0,
            });
        }

        let remove_before = now - period as f64;
        while let Some(front) = self.buckets.front() {
            if (front.start as f64) < remove_before {
                let evicted = self.buckets.pop_front().expect("front just peeked");
                self.window_total -= evicted.load;
                self.correct_drift_descending();
            } else {
                break;
            }
        }
    }

    /// Clamps away negative drift introduced by eviction.
    fn correct_drift_descending(&mut self) {
        if self.window_total < 0.0 {
            if self.window_total.abs() >= 0.1 {
                tracing::debug!(
                    drift = self.window_total,
                    "corrected descending drift error"
                );
            }
            self.window_total = 0.0;
        }
    }

    /// Recomputes `window_total` from the buckets if it has drifted by more
    /// than 0.001; called on every reject path before penalties apply.
    pub fn correct_drift_ascending(&mut self) {
        let recomputed: f64 = self.buckets.iter().map(|b| b.load).sum();
        let diff = (recomputed - self.window_total).abs();
        if diff > 0.001 {
            if diff >= 0.1 {
                tracing::debug!(
                    before = self.window_total,
                    after = recomputed,
                    "corrected ascending drift error"
                );
            }
            self.window_total = recomputed;
        }
    }

    /// Removes `window_total - max_cap` by subtracting from the oldest
    /// bucket(s) first, draining each to zero before moving right.
    pub fn trim_from_oldest(&mut self, max_cap: f64) {
        let mut excess = self.window_total - max_cap;
        if excess <= 0.0 {
            return;
        }
        for bucket in self.buckets.iter_mut() {
            if excess <= 0.0 {
                break;
            }
            if bucket.load > 0.0 {
                let removed = bucket.load.min(excess);
                bucket.load -= removed;
                excess -= removed;
                self.window_total -= removed;
            }
        }
        if excess > 0.0 {
            tracing::warn!(
                remaining = excess,
                "trim-from-oldest could not fully restore the max cap"
            );
        }
    }
}
