//! Serializable limiter state (component C6) for save/restore.

use serde::{Deserialize, Serialize};

use crate::config::{Derived, LimiterConfig};
use crate::error::{Error, Result};
use crate::limiter::LimiterState;
use crate::window::{Bucket, Window};

/// The serializable state of a [`crate::limiter::Limiter`].
///
/// Round-trips byte-identically through `restore(snapshot(limiter))`: every
/// field named in the window invariants (buckets, `window_total`, `was_over`)
/// plus the configuration digest needed to detect a mismatched restore
/// target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Bucket contents as `(start, load)` pairs, oldest first.
    pub buckets: Vec<(i64, f64)>,
    pub window_total: f64,
    pub was_over: bool,

    pub num_max_buckets: u64,
    pub step_period: i64,
    pub period: u64,
    pub maxload: f64,
    pub max_cap: f64,

    pub fragmentation: f64,
    pub penalty_factor: f64,
    pub penalty_distribution_factor: f64,
    pub request_overhead_penalty_factor: f64,
    pub request_overhead_penalty_distribution_factor: f64,
    pub max_penalty_cap_factor: f64,
    pub compute_tta: bool,
}

impl Snapshot {
    pub(crate) fn capture(config: &LimiterConfig, derived: &Derived, state: &LimiterState) -> Self {
        Self {
            buckets: state.window.buckets.iter().map(|b| (b.start, b.load)).collect(),
            window_total: state.window.window_total,
            was_over: state.was_over,
            num_max_buckets: derived.num_max_buckets,
            step_period: derived.step_period,
            period: config.period,
            maxload: config.maxload,
            max_cap: derived.max_cap,
            fragmentation: config.fragmentation,
            penalty_factor: config.penalty_factor,
            penalty_distribution_factor: config.penalty_distribution_factor,
            request_overhead_penalty_factor: config.request_overhead_penalty_factor,
            request_overhead_penalty_distribution_factor: config
                .request_overhead_penalty_distribution_factor,
            max_penalty_cap_factor: config.max_penalty_cap_factor,
            compute_tta: config.compute_tta,
        }
    }

    pub(crate) fn apply(
        self,
        config: &LimiterConfig,
        derived: &Derived,
        state: &mut LimiterState,
    ) -> Result<()> {
        let digest_matches = self.num_max_buckets == derived.num_max_buckets
            && self.step_period == derived.step_period
            && self.period == config.period
            && (self.maxload - config.maxload).abs() < 1e-9
            && (self.max_cap - derived.max_cap).abs() < 1e-9;

        if !digest_matches {
            return Err(Error::InvalidConfig(
                "snapshot configuration digest does not match this limiter's configuration".into(),
            ));
        }

        state.window = Window {
            buckets: self
                .buckets
                .into_iter()
                .map(|(start, load)| Bucket { start, load })
                .collect(),
            window_total: self.window_total,
        };
        state.was_over = self.was_over;
        Ok(())
    }
}
