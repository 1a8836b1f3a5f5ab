//! Exponential backoff around a whole portal scrape.
//!
//! The portal fails often and for reasons that are gone a minute later, so a
//! failed scrape is replayed from scratch after a growing pause. Errors whose
//! [`ErrorKind`](crate::error::ErrorKind) is not retryable are returned at once.

use crate::error::GrdfError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// How many times to attempt an operation and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub tries: u32,
    /// Pause after the first failed attempt
    pub delay: Duration,
    /// Factor applied to the pause after every failed attempt
    pub backoff: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            tries: 4,
            delay: Duration::from_secs(60),
            backoff: 3,
        }
    }
}

impl RetryPolicy {
    pub fn new(tries: u32, delay: Duration, backoff: u32) -> Self {
        Self {
            tries,
            delay,
            backoff,
        }
    }

    /// The pauses taken between attempts, in order.
    ///
    /// There is one pause fewer than there are attempts.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        let pauses = self.tries.saturating_sub(1) as usize;
        std::iter::successors(Some(self.delay), move |delay| {
            delay.checked_mul(self.backoff)
        })
        .take(pauses)
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// runs out of attempts.
///
/// The error of the last attempt is returned unchanged.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, GrdfError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GrdfError>>,
{
    let mut delays = policy.delays();
    let mut attempt: u32 = 1;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.kind().is_retryable() {
            tracing::error!(
                operation = operation_name,
                kind = ?err.kind(),
                "{}, not retrying",
                err
            );
            return Err(err);
        }

        let Some(delay) = delays.next() else {
            tracing::error!(
                operation = operation_name,
                attempts = attempt,
                "Giving up: {}",
                err
            );
            return Err(err);
        };

        tracing::warn!(
            operation = operation_name,
            attempt,
            kind = ?err.kind(),
            "{}, retrying in {} seconds...",
            err,
            delay.as_secs()
        );
        sleep(delay).await;
        attempt += 1;
    }
}
