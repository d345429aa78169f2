use std::sync::Arc;

use load_guard_core::clock::FrozenClock;
use load_guard_core::{CompositeLimiter, Limiter, LimiterConfig};

#[test]
fn test_composite_two_phase_atomicity() {
    // L1(maxload=100, period=20), L2(maxload=20, period=4). Submit 15 until
    // L2 saturates; the next submit is rejected by the composite, and L1's
    // window_total must not include that rejected load.
    let clock = Arc::new(FrozenClock::new(10_000.0));

    let l1 = Arc::new(
        Limiter::with_clock(
            LimiterConfig {
                maxload: 100.0,
                period: 20,
                ..Default::default()
            },
            Box::new(clock.clone()),
        )
        .unwrap(),
    );
    let l2 = Arc::new(
        Limiter::with_clock(
            LimiterConfig {
                maxload: 20.0,
                period: 4,
                ..Default::default()
            },
            Box::new(clock.clone()),
        )
        .unwrap(),
    );

    let composite = CompositeLimiter::new(None, vec![l1.clone(), l2.clone()]).unwrap();

    // First submit(15): both children have room, accepted.
    assert!(composite.submit(15.0).accepted);
    assert_eq!(l1.window_total(), 15.0);
    assert_eq!(l2.window_total(), 15.0);

    // Second submit(15): L2 would reach 30 > 20, L1 would reach 30 <= 100.
    // The composite must reject, and L1's total must stay at 15.
    let outcome = composite.submit(15.0);
    assert!(!outcome.accepted);
    assert_eq!(l1.window_total(), 15.0, "L1 must not absorb a load rejected by a sibling");
    assert_eq!(l2.window_total(), 15.0);
}

#[test]
fn test_composite_requires_at_least_one_child() {
    assert!(CompositeLimiter::new(None, vec![]).is_err());
}

#[test]
fn test_composite_accessors_reflect_widest_period_child() {
    let clock = Arc::new(FrozenClock::new(0.0));
    let narrow = Arc::new(
        Limiter::with_clock(
            LimiterConfig {
                maxload: 20.0,
                period: 4,
                ..Default::default()
            },
            Box::new(clock.clone()),
        )
        .unwrap(),
    );
    let wide = Arc::new(
        Limiter::with_clock(
            LimiterConfig {
                maxload: 100.0,
                period: 20,
                ..Default::default()
            },
            Box::new(clock.clone()),
        )
        .unwrap(),
    );

    let composite = CompositeLimiter::new("api".to_string(), vec![narrow, wide]).unwrap();
    assert_eq!(composite.name(), Some("api"));
    assert_eq!(composite.period(), 20);
    assert_eq!(composite.maxload(), 100.0);
}

#[test]
fn test_composite_distribute_reaches_every_child() {
    let clock = Arc::new(FrozenClock::new(0.0));
    let a = Arc::new(
        Limiter::with_clock(
            LimiterConfig {
                maxload: 10.0,
                period: 2,
                ..Default::default()
            },
            Box::new(clock.clone()),
        )
        .unwrap(),
    );
    let b = Arc::new(
        Limiter::with_clock(
            LimiterConfig {
                maxload: 10.0,
                period: 2,
                ..Default::default()
            },
            Box::new(clock.clone()),
        )
        .unwrap(),
    );

    let composite = CompositeLimiter::new(None, vec![a.clone(), b.clone()]).unwrap();
    composite.distribute(4.0);

    assert_eq!(a.window_total(), 4.0);
    assert_eq!(b.window_total(), 4.0);
}
