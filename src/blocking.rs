//! Blocking wrapper around [`LoadLimiter::submit`]: a thin retry loop that
//! sleeps on `retry_in` between attempts.
//!
//! This is deliberately not part of the core accounting engine. It adds no
//! semantics beyond "call submit, and if rejected with a usable `retry_in`,
//! sleep that long and try again", but it saves every caller from
//! reimplementing the same loop.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::LoadLimiter;

/// Attempts to admit `load` once, without waiting.
pub fn try_acquire<L: LoadLimiter + ?Sized>(limiter: &L, load: f64) -> Result<()> {
    let outcome = limiter.submit(load);
    if outcome.accepted {
        Ok(())
    } else {
        Err(Error::LoadLimitExceeded {
            retry_in: outcome.retry_in,
        })
    }
}

/// Repeatedly calls `submit`, sleeping `ceil(retry_in)` seconds between
/// attempts, until admitted, the limiter reports no usable `retry_in`, or
/// the cumulative wait would exceed `timeout`.
pub fn acquire<L: LoadLimiter + ?Sized>(limiter: &L, load: f64, timeout: Option<Duration>) -> Result<()> {
    let start = Instant::now();
    loop {
        let outcome = limiter.submit(load);
        if outcome.accepted {
            return Ok(());
        }

        let retry_in = match outcome.retry_in {
            Some(r) if r > 0.0 => r,
            _ => {
                return Err(Error::LoadLimitExceeded {
                    retry_in: outcome.retry_in,
                })
            }
        };

        let wait = Duration::from_secs_f64(retry_in.ceil());
        if let Some(budget) = timeout {
            if start.elapsed() + wait >= budget {
                return Err(Error::Timeout);
            }
        }

        std::thread::sleep(wait);
    }
}
