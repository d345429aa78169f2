//! error.rs
//! Error taxonomy for construction-time and blocking-wrapper failures.
//!
//! `submit` itself never raises: every rejection is reported in its
//! [`crate::limiter::SubmitOutcome`]. Only configuration validation and the
//! blocking wrapper around `submit` produce an [`Error`].

use thiserror::Error;

/// Errors surfaced by this crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Raised by limiter construction when a [`crate::config::LimiterConfig`]
    /// violates one of its documented constraints. No partial limiter is
    /// ever produced.
    #[error("invalid limiter configuration: {0}")]
    InvalidConfig(String),

    /// Raised by the blocking wrapper when a non-waiting submit cannot be
    /// admitted, or when waiting is disabled/pointless (`retry_in` is
    /// `None` or non-positive).
    #[error("load limit exceeded{}", retry_in_suffix(*retry_in))]
    LoadLimitExceeded {
        /// The estimate the rejected submit reported, if any.
        retry_in: Option<f64>,
    },

    /// Raised by the blocking wrapper when its cumulative wait would exceed
    /// the caller's timeout budget.
    #[error("timed out waiting for the load limiter to admit the request")]
    Timeout,
}

fn retry_in_suffix(retry_in: Option<f64>) -> String {
    match retry_in {
        Some(r) => format!(" (load capacity available in {:.3} seconds)", r),
        None => String::new(),
    }
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
