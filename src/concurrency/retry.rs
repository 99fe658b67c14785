//! Retry with exponential backoff and jitter, for adapter calls whose error
//! reports itself as retriable.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

const MAX_RETRIES: u32 = 3;
const BASE_DELAY_MS: u64 = 250;

/// Retries `f` up to `MAX_RETRIES` additional times while `is_retriable`
/// returns true for the error, with exponential backoff (`BASE_DELAY_MS *
/// 2^attempt`) plus up to 50% jitter so retries from a thundering herd
/// don't all land on the same tick.
pub async fn retry_with_backoff<T, E, F, Fut>(is_retriable: impl Fn(&E) -> bool, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < MAX_RETRIES && is_retriable(&err) => {
                let base = BASE_DELAY_MS * 2u64.pow(attempt);
                let jitter = rand::thread_rng().gen_range(0..=base / 2);
                tokio::time::sleep(Duration::from_millis(base + jitter)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let attempts = AtomicU32::new(0);
        let result = retry_with_backoff(
            |_: &&str| true,
            || async {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err("transient")
                } else {
                    Ok(n)
                }
            },
        )
        .await;
        assert_eq!(result, Ok(2));
    }

    #[tokio::test]
    async fn non_retriable_error_fails_immediately() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), &str> = retry_with_backoff(
            |_: &&str| false,
            || async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err("permanent")
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), &str> = retry_with_backoff(
            |_: &&str| true,
            || async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err("always fails")
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), MAX_RETRIES + 1);
    }
}
