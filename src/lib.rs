//! A sliding-window load limiter for Rust applications.
//!
//! This crate provides a single in-process primitive that decides, for each
//! incoming unit of work, whether admitting it would keep the aggregate
//! "load" submitted over a rolling time window below a configured ceiling.
//! When admission is denied it optionally estimates the soonest future time
//! an equivalent request would be accepted, so callers can back off
//! intelligently. It also supports penalty distribution (throttling bursts
//! past the ceiling by injecting synthetic load) and composition (requiring
//! several independent limiters to simultaneously admit).
//!
//! # Quick Start
//!
//! ```rust
//! use load_guard_core::{Limiter, LimiterConfig};
//!
//! let limiter = Limiter::new(LimiterConfig {
//!     maxload: 10.0,
//!     period: 2,
//!     ..Default::default()
//! }).unwrap();
//!
//! assert!(limiter.submit(3.0).accepted);
//! assert!(limiter.submit(3.0).accepted);
//! assert_eq!(limiter.instant_load_factor(), 0.6);
//! ```
//!
//! # Core Concepts
//!
//! ## Windowed accounting
//! Load is tracked in time-aligned buckets covering a rolling `period`; see
//! [`Limiter::submit`] and the [`window`] module for the accounting engine.
//!
//! ## Penalty distribution
//! A burst that overflows the ceiling has synthetic load spread backward
//! across the window, clamped by a hard max cap; see the [`penalty`] module.
//!
//! ## Composition
//! [`CompositeLimiter`] admits a request iff every child limiter would admit
//! it, using a local two-phase commit so partial rejections never leave a
//! child's state half-updated.
//!
//! ## This is not a token bucket
//! There is no refill rate and no burst bucket. This is a sliding-window sum
//! with synthetic-load penalties; do not "simplify" it into a bucket scheme.

pub mod blocking;
pub mod clock;
pub mod composite;
pub mod config;
pub mod error;
pub mod limiter;
mod penalty;
pub mod snapshot;
mod tta;
pub(crate) mod window;

pub use clock::{Clock, FrozenClock, SystemClock};
pub use composite::CompositeLimiter;
pub use config::LimiterConfig;
pub use error::{Error, Result};
pub use limiter::{Limiter, SubmitOutcome};
pub use snapshot::Snapshot;

/// Common surface shared by [`Limiter`] and [`CompositeLimiter`], so hosts
/// can hold either behind one abstraction (e.g. the [`blocking`] wrapper).
pub trait LoadLimiter: Send + Sync {
    /// Attempts to admit `load`.
    fn submit(&self, load: f64) -> SubmitOutcome;
    /// `window_total / maxload` (widest child for a composite), or `0`.
    fn instant_load_factor(&self) -> f64;
    /// Injects `amount` of synthetic load.
    fn distribute(&self, amount: f64);
    /// Admission ceiling over `period`.
    fn maxload(&self) -> f64;
    /// Window length in seconds.
    fn period(&self) -> u64;
    /// Current `window_total`.
    fn window_total(&self) -> f64;
}

impl LoadLimiter for Limiter {
    fn submit(&self, load: f64) -> SubmitOutcome {
        Limiter::submit(self, load)
    }
    fn instant_load_factor(&self) -> f64 {
        Limiter::instant_load_factor(self)
    }
    fn distribute(&self, amount: f64) {
        Limiter::distribute(self, amount)
    }
    fn maxload(&self) -> f64 {
        Limiter::maxload(self)
    }
    fn period(&self) -> u64 {
        Limiter::period(self)
    }
    fn window_total(&self) -> f64 {
        Limiter::window_total(self)
    }
}

impl LoadLimiter for CompositeLimiter {
    fn submit(&self, load: f64) -> SubmitOutcome {
        CompositeLimiter::submit(self, load)
    }
    fn instant_load_factor(&self) -> f64 {
        CompositeLimiter::instant_load_factor(self)
    }
    fn distribute(&self, amount: f64) {
        CompositeLimiter::distribute(self, amount)
    }
    fn maxload(&self) -> f64 {
        CompositeLimiter::maxload(self)
    }
    fn period(&self) -> u64 {
        CompositeLimiter::period(self)
    }
    fn window_total(&self) -> f64 {
        CompositeLimiter::window_total(self)
    }
}
