//! Time-to-availability estimation (component C3): the earliest future
//! instant at which a rejected load would fit, assuming no new arrivals.

use crate::window::Window;

/// Estimates seconds until `load` would be admitted, given the current
/// window state. Returns `None` when no future time (in isolation) would
/// admit it, or when `load` permanently exceeds `maxload`.
pub(crate) fn compute_tta(
    window: &Window,
    load: f64,
    maxload: f64,
    period: i64,
    now: f64,
) -> Option<f64> {
    if load > maxload {
        return None;
    }

    let to_free = if window.window_total > maxload {
        load + (window.window_total - maxload)
    } else {
        load - (maxload - window.window_total)
    };

    if to_free <= 0.0 {
        tracing::warn!("inconsistent TTA compute base; returning default 1.0s");
        return Some(1.0);
    }

    let mut acc = 0.0;
    let mut reached_at: Option<i64> = None;
    for bucket in window.buckets.iter() {
        acc += bucket.load;
        if acc >= to_free {
            reached_at = Some(bucket.start);
            break;
        }
    }

    let b_start = reached_at?;
    Some(b_start as f64 + period as f64 - now)
}
