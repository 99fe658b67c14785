//! Deterministic mock adapters for tests and for running the pipeline
//! without a live LLM/embedding backend configured.
//!
//! Grounded on the teacher's test-only mock embedders in `adapter/embedding.rs`;
//! promoted to non-test code here since integration tests across module
//! boundaries need a shared, reusable mock rather than a private test helper.

use async_trait::async_trait;

use crate::error::AdapterError;

use super::traits::{EmbeddingAdapter, LlmAdapter};

/// Echoes a canned response, or the prompt itself if none was configured.
/// Useful for pipeline tests that only care that a call happened.
pub struct MockLlmAdapter {
    response: Option<String>,
}

impl MockLlmAdapter {
    pub fn new() -> Self {
        Self { response: None }
    }

    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
        }
    }
}

impl Default for MockLlmAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmAdapter for MockLlmAdapter {
    async fn complete(&self, prompt: &str) -> Result<String, AdapterError> {
        Ok(self.response.clone().unwrap_or_else(|| prompt.to_string()))
    }
}

/// Produces a deterministic, content-derived vector instead of calling a
/// real embedding model: each dimension is a hash of the text salted by
/// dimension index, scaled into `[-1, 1]`. Not semantically meaningful, but
/// stable and cheap, which is what tests need.
pub struct MockEmbeddingAdapter {
    dims: usize,
}

impl MockEmbeddingAdapter {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }
}

impl Default for MockEmbeddingAdapter {
    fn default() -> Self {
        Self::new(8)
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbeddingAdapter {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AdapterError> {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let vector = (0..self.dims)
            .map(|i| {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                i.hash(&mut hasher);
                let bucket = (hasher.finish() % 2000) as f32 - 1000.0;
                bucket / 1000.0
            })
            .collect();
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}
