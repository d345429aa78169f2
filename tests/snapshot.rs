use std::sync::Arc;

use load_guard_core::clock::FrozenClock;
use load_guard_core::{Limiter, LimiterConfig};

fn config() -> LimiterConfig {
    LimiterConfig {
        maxload: 10.0,
        period: 4,
        ..Default::default()
    }
}

#[test]
fn test_snapshot_round_trip_restores_observable_state() {
    let clock = Arc::new(FrozenClock::new(42.0));
    let limiter = Limiter::with_clock(config(), Box::new(clock.clone())).unwrap();

    assert!(limiter.submit(4.0).accepted);
    clock.advance(1.0);
    assert!(limiter.submit(3.0).accepted);

    let snap = limiter.snapshot();

    let restored = Limiter::with_clock(config(), Box::new(clock.clone())).unwrap();
    restored.restore(snap).unwrap();

    assert_eq!(restored.window_total(), limiter.window_total());
    assert_eq!(restored.instant_load_factor(), limiter.instant_load_factor());
}

#[test]
fn test_snapshot_serializes_through_serde_json() {
    let clock = Arc::new(FrozenClock::new(0.0));
    let limiter = Limiter::with_clock(config(), Box::new(clock)).unwrap();
    assert!(limiter.submit(5.0).accepted);

    let snap = limiter.snapshot();
    let encoded = serde_json::to_string(&snap).unwrap();
    let decoded: load_guard_core::Snapshot = serde_json::from_str(&encoded).unwrap();

    assert_eq!(decoded, snap);
}

#[test]
fn test_restore_rejects_mismatched_configuration() {
    let clock = Arc::new(FrozenClock::new(0.0));
    let limiter = Limiter::with_clock(config(), Box::new(clock.clone())).unwrap();
    assert!(limiter.submit(5.0).accepted);
    let snap = limiter.snapshot();

    let other = Limiter::with_clock(
        LimiterConfig {
            maxload: 99.0,
            ..config()
        },
        Box::new(clock),
    )
    .unwrap();

    assert!(other.restore(snap).is_err());
}
