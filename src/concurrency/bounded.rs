//! A semaphore- and timeout-gated wrapper around an `LlmAdapter`.
//!
//! Grounded on the teacher's `AnalysisOrchestrator`, which gates LLM-backed
//! analyzer calls behind a `Semaphore` and a per-call `tokio::time::timeout`,
//! treating a timed-out call as a recoverable failure rather than a hard
//! abort of the whole batch.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::adapter::LlmAdapter;
use crate::error::AdapterError;

/// Wraps an `LlmAdapter` so every call is limited to `max_concurrent`
/// in-flight requests and aborted after `timeout` regardless of backend
/// behavior.
pub struct BoundedAdapter<A: LlmAdapter> {
    inner: A,
    semaphore: Arc<Semaphore>,
    timeout: Duration,
}

impl<A: LlmAdapter> BoundedAdapter<A> {
    pub fn new(inner: A, max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            inner,
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
        }
    }
}

#[async_trait]
impl<A: LlmAdapter> LlmAdapter for BoundedAdapter<A> {
    async fn complete(&self, prompt: &str) -> Result<String, AdapterError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| AdapterError::Failed(e.to_string()))?;
        match tokio::time::timeout(self.timeout, self.inner.complete(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(AdapterError::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MockLlmAdapter;

    #[tokio::test]
    async fn completes_within_timeout() {
        let adapter = BoundedAdapter::new(MockLlmAdapter::with_response("ok"), 2, Duration::from_secs(1));
        assert_eq!(adapter.complete("hi").await.unwrap(), "ok");
    }

    struct SlowAdapter;
    #[async_trait]
    impl LlmAdapter for SlowAdapter {
        async fn complete(&self, _prompt: &str) -> Result<String, AdapterError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok("too late".to_string())
        }
    }

    #[tokio::test]
    async fn timeout_surfaces_as_timeout_error() {
        let adapter = BoundedAdapter::new(SlowAdapter, 1, Duration::from_millis(5));
        let err = adapter.complete("hi").await.unwrap_err();
        assert!(matches!(err, AdapterError::Timeout));
    }
}
