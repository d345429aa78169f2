//! Limiter configuration: the immutable parameters a [`crate::limiter::Limiter`]
//! is constructed from, and the values derived from them once at construction.

use crate::error::{Error, Result};

/// Immutable configuration for a [`crate::limiter::Limiter`].
///
/// Mirrors the constructor parameters of the original `LoadLimiter`, with
/// defaults carried over from `original_source/load_limiter/load_limiter.py`.
#[derive(Debug, Clone, PartialEq)]
pub struct LimiterConfig {
    /// Optional human-readable name, surfaced in tracing events.
    pub name: Option<String>,
    /// Admission ceiling over `period`. Must be `> 0`.
    pub maxload: f64,
    /// Window length in seconds. Must be `>= 1`.
    pub period: u64,
    /// Bucket size as a fraction of `period`, in `[0.01, 1.0]`.
    pub fragmentation: f64,
    /// Entry penalty as a fraction of `maxload`. Must be `>= 0`.
    pub penalty_factor: f64,
    /// Fraction of buckets the entry penalty is spread across, in `[0, 1]`.
    pub penalty_distribution_factor: f64,
    /// Per-request penalty multiplier while still over. Must be `>= 0`.
    pub request_overhead_penalty_factor: f64,
    /// Spread width for the overhead penalty, in `[0, 1]`.
    pub request_overhead_penalty_distribution_factor: f64,
    /// Hard ceiling on `window_total`, as a fraction above `maxload`. Must be `>= 0`.
    pub max_penalty_cap_factor: f64,
    /// Whether to compute `retry_in` on reject.
    pub compute_tta: bool,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            name: None,
            maxload: 60.0,
            period: 60,
            fragmentation: 0.05,
            penalty_factor: 0.0,
            penalty_distribution_factor: 0.2,
            request_overhead_penalty_factor: 0.0,
            request_overhead_penalty_distribution_factor: 0.3,
            max_penalty_cap_factor: 0.25,
            compute_tta: true,
        }
    }
}

/// Values derived once from a [`LimiterConfig`] at construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Derived {
    pub step_period: i64,
    pub num_max_buckets: u64,
    pub max_cap: f64,
    pub entry_penalty: u64,
}

impl LimiterConfig {
    /// Validates every constraint and computes the derived parameters.
    ///
    /// Returns [`Error::InvalidConfig`] on the first violation found, never
    /// a partially-initialized limiter.
    pub(crate) fn validate(&self) -> Result<Derived> {
        if !(self.maxload > 0.0) {
            return Err(Error::InvalidConfig(
                "maxload must be a positive number".into(),
            ));
        }
        if self.period < 1 {
            return Err(Error::InvalidConfig(
                "period must be a positive integer number of seconds".into(),
            ));
        }
        if !(0.01..=1.0).contains(&self.fragmentation) {
            return Err(Error::InvalidConfig(
                "fragmentation must be in the range 0.01 - 1.0".into(),
            ));
        }
        if self.penalty_factor < 0.0 {
            return Err(Error::InvalidConfig(
                "penalty_factor must not be negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.penalty_distribution_factor) {
            return Err(Error::InvalidConfig(
                "penalty_distribution_factor must be in the range 0.0 - 1.0".into(),
            ));
        }
        if self.request_overhead_penalty_factor < 0.0 {
            return Err(Error::InvalidConfig(
                "request_overhead_penalty_factor must not be negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.request_overhead_penalty_distribution_factor) {
            return Err(Error::InvalidConfig(
                "request_overhead_penalty_distribution_factor must be in the range 0.0 - 1.0"
                    .into(),
            ));
        }
        if self.max_penalty_cap_factor < 0.0 {
            return Err(Error::InvalidConfig(
                "max_penalty_cap_factor must not be negative".into(),
            ));
        }

        let step_period = (self.period as f64 * self.fragmentation).ceil().max(1.0) as i64;
        let num_max_buckets = ((self.period as f64) / (step_period as f64)).ceil() as u64;
        let max_cap = self.maxload * (1.0 + self.max_penalty_cap_factor);
        let entry_penalty = (self.maxload * self.penalty_factor).floor();
        let entry_penalty = if entry_penalty > 0.0 {
            entry_penalty as u64
        } else {
            0
        };

        Ok(Derived {
            step_period,
            num_max_buckets,
            max_cap,
            entry_penalty,
        })
    }
}
