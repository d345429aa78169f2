use std::sync::Arc;

use load_guard_core::clock::FrozenClock;
use load_guard_core::{Limiter, LimiterConfig};

#[test]
fn test_penalty_distribution_on_reject() {
    // maxload=10, period=2, penalty_factor=0.5, penalty_distribution_factor=1.0
    let clock = Arc::new(FrozenClock::new(5_000.0));
    let limiter = Limiter::with_clock(
        LimiterConfig {
            maxload: 10.0,
            period: 2,
            penalty_factor: 0.5,
            penalty_distribution_factor: 1.0,
            ..Default::default()
        },
        Box::new(clock),
    )
    .unwrap();

    // Saturate to window_total = 10.
    assert!(limiter.submit(10.0).accepted);
    assert_eq!(limiter.window_total(), 10.0);

    // A rejected submit(1) applies the entry penalty: floor(10 * 0.5) = 5,
    // spread across the window, clamped to max_cap = 10 * 1.25 = 12.5.
    let outcome = limiter.submit(1.0);
    assert!(!outcome.accepted);
    assert_eq!(limiter.window_total(), 12.5);
}

#[test]
fn test_max_cap_clamp_holds_under_repeated_penalties() {
    // With max_penalty_cap_factor = 0.25, no sequence of accepts + penalties
    // should push window_total above 12.5 for maxload = 10.
    let clock = Arc::new(FrozenClock::new(9_000.0));
    let limiter = Limiter::with_clock(
        LimiterConfig {
            maxload: 10.0,
            period: 2,
            penalty_factor: 0.9,
            penalty_distribution_factor: 1.0,
            request_overhead_penalty_factor: 0.5,
            request_overhead_penalty_distribution_factor: 1.0,
            max_penalty_cap_factor: 0.25,
            ..Default::default()
        },
        Box::new(clock),
    )
    .unwrap();

    assert!(limiter.submit(10.0).accepted);
    for _ in 0..50 {
        limiter.submit(3.0);
        assert!(limiter.window_total() <= 12.5 + 1e-9, "window_total={}", limiter.window_total());
    }
}

#[test]
fn test_distribute_injects_synthetic_load() {
    let clock = Arc::new(FrozenClock::new(1.0));
    let limiter = Limiter::with_clock(
        LimiterConfig {
            maxload: 10.0,
            period: 2,
            ..Default::default()
        },
        Box::new(clock),
    )
    .unwrap();

    limiter.distribute(4.0);
    assert_eq!(limiter.window_total(), 4.0);
}
