//! Bounded retry with exponential backoff.
//!
//! Each attempt classifies its own failure as transient, permanent, or
//! transient-with-a-hint, and the combinator returns either the first
//! success or the last failure together with the number of attempts made.

use std::future::Future;
use std::time::Duration;

/// How many times to try, and how long to wait in between.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after every retry.
    pub initial_delay: Duration,
    /// Upper bound for the doubling delay.
    pub max_delay: Duration,
    /// Upper bound for a server-supplied wait such as `retry-after`.
    pub max_hint: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            max_hint: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Retry up to `max_attempts` times without sleeping in between.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            max_hint: Duration::ZERO,
        }
    }
}

/// A failed attempt, classified.
#[derive(Debug)]
pub enum Retry<E> {
    /// Worth trying again after the policy's backoff.
    Transient(E),
    /// Worth trying again, but not before the given delay.
    After(E, Duration),
    /// Trying again cannot help.
    Permanent(E),
}

impl<E> Retry<E> {
    pub fn into_inner(self) -> E {
        match self {
            Retry::Transient(e) | Retry::After(e, _) | Retry::Permanent(e) => e,
        }
    }
}

/// All attempts failed.
#[derive(Debug)]
pub struct RetryError<E> {
    /// Attempts made, including the last one.
    pub attempts: u32,
    /// The error from the last attempt.
    pub last: E,
}

/// Run `op` until it succeeds, fails permanently, or the budget runs out.
///
/// `op` receives the 1-based attempt number.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, Retry<E>>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut delay = policy.initial_delay;
    let mut attempt = 1;

    loop {
        let failure = match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(Retry::Permanent(last)) => {
                return Err(RetryError {
                    attempts: attempt,
                    last,
                })
            }
            Err(failure) => failure,
        };

        if attempt >= max_attempts {
            return Err(RetryError {
                attempts: attempt,
                last: failure.into_inner(),
            });
        }

        let wait = match &failure {
            Retry::After(_, hint) => (*hint).min(policy.max_hint),
            _ => delay,
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        delay = (delay * 2).min(policy.max_delay);
        attempt += 1;
    }
}
