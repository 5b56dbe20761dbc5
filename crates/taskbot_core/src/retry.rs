//! Bounded retry with fixed backoff for outbound calls.

use log::warn;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(2);

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Fixed wait between a failed attempt and the next one.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }
}

/// Runs `op` until it succeeds or `policy.max_attempts` is reached.
///
/// `op` receives the 1-based attempt number. Every failure is logged with
/// `attempt=N/M`; there is no wait after the final attempt. The error of the
/// last attempt is returned unchanged.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!(
                    "event=retry_attempt module=retry status=error target=\"{}\" attempt={}/{} error={}",
                    label, attempt, max_attempts, err
                );
                if attempt >= max_attempts {
                    return Err(err);
                }
            }
        }

        tokio::time::sleep(policy.backoff).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{retry_with_backoff, RetryPolicy};
    use std::cell::Cell;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_after_two_backoffs() {
        let calls = Cell::new(0);
        let started = Instant::now();

        let result: Result<&str, String> =
            retry_with_backoff(RetryPolicy::default(), "test", |attempt| {
                calls.set(calls.get() + 1);
                async move {
                    if attempt < 3 {
                        Err(format!("boom {attempt}"))
                    } else {
                        Ok("delivered")
                    }
                }
            })
            .await;

        assert_eq!(result, Ok("delivered"));
        assert_eq!(calls.get(), 3);
        assert!(started.elapsed() >= Duration::from_secs(4));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn returns_last_error_without_trailing_wait() {
        let started = Instant::now();
        let result: Result<(), String> =
            retry_with_backoff(RetryPolicy::new(3, Duration::from_secs(2)), "test", |attempt| {
                async move { Err(format!("fail {attempt}")) }
            })
            .await;

        assert_eq!(result, Err("fail 3".to_string()));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_tries_once() {
        let calls = Cell::new(0);
        let result: Result<(), &str> =
            retry_with_backoff(RetryPolicy::new(0, Duration::from_secs(1)), "test", |_| {
                calls.set(calls.get() + 1);
                async { Err("nope") }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
