//! Penalty distribution (component C2): spreads synthetic load backward
//! across buckets, synthesizing left or middle buckets as needed.

use crate::window::{Bucket, Window};

/// Adds `amount` of synthetic load to `window`, spread across
/// `num_max_buckets * factor` buckets counting back from the last one.
///
/// Falls back to placing the whole amount on the last bucket when the
/// spread width is degenerate (`k <= 1`) or too fine-grained to matter
/// (`amount / k <= 1`). Clamps the result to `max_cap` via trim-from-oldest.
pub(crate) fn distribute_penalty(
    window: &mut Window,
    amount: f64,
    factor: f64,
    step_period: i64,
    num_max_buckets: u64,
    max_cap: f64,
) {
    if amount <= 0.0 || window.buckets.is_empty() {
        return;
    }

    let mut k = ((num_max_buckets as f64) * factor).floor() as i64;
    let candidate_per_bucket = if k > 0 { amount / k as f64 } else { amount };
    if k <= 1 || candidate_per_bucket <= 1.0 {
        k = 1;
    }
    let per_bucket = if k == 1 { amount } else { amount / k as f64 };

    window.window_total += amount;

    let last_start = window.buckets.back().expect("checked non-empty above").start;
    let mut len = window.buckets.len();

    for i in 0..k as usize {
        let expected_start = last_start - (i as i64) * step_period;

        if len <= i {
            // No bucket exists at offset -(i+1): synthesize one at the left.
            window.buckets.push_front(Bucket {
                start: expected_start,
                load: per_bucket,
            });
            len += 1;
            continue;
        }

        let idx = len - 1 - i;
        if window.buckets[idx].start < expected_start {
            // Bucket at that offset is older than expected: there's a gap,
            // synthesize a middle bucket right after it to preserve ordering.
            window.buckets.insert(
                idx + 1,
                Bucket {
                    start: expected_start,
                    load: per_bucket,
                },
            );
            len += 1;
        } else {
            window.buckets[idx].load += per_bucket;
        }
    }

    if window.window_total > max_cap {
        window.trim_from_oldest(max_cap);
    }
}
