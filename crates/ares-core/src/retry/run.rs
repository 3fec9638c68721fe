//! Retry loop: run a closure until success or policy says stop.

use std::time::Duration;

use super::classify;
use super::error::{AttemptError, DeliveryFailure};
use super::policy::{ErrorKind, RetryDecision, RetryPolicy};

/// Blocks the current thread between attempts. Swappable so tests don't wait out real backoff.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, delay: Duration);
}

/// Default sleeper: `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Runs a closure until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
pub fn run_with_retry<F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    method: &str,
    mut f: F,
) -> Result<(), DeliveryFailure>
where
    F: FnMut() -> Result<(), AttemptError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(()) => return Ok(()),
            Err(e) => {
                let kind = classify::classify(policy, &e);
                match policy.decide(attempt, kind, method) {
                    RetryDecision::NoRetry
                        if attempt > policy.max_retries && kind != ErrorKind::Other =>
                    {
                        return Err(DeliveryFailure::RetriesExhausted {
                            attempts: attempt,
                            last: e,
                        });
                    }
                    RetryDecision::NoRetry => return Err(DeliveryFailure::Rejected(e)),
                    RetryDecision::RetryAfter(d) => {
                        tracing::warn!(
                            "attempt {} failed ({}); retrying in {:?}",
                            attempt,
                            e,
                            d
                        );
                        sleeper.sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
