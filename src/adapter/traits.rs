//! The two external-call seams: `LlmAdapter` and `EmbeddingAdapter`.

use async_trait::async_trait;

use crate::error::AdapterError;

/// A single free-form prompt/response LLM call. Implementations decide their
/// own model, timeout, and retry policy; the pipeline wraps every call in
/// `concurrency::bounded::BoundedAdapter` for concurrency-limiting and a
/// hard timeout regardless.
#[async_trait]
pub trait LlmAdapter: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AdapterError>;
}

/// Turns text into a fixed-dimension embedding vector.
#[async_trait]
pub trait EmbeddingAdapter: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AdapterError>;

    /// The dimensionality this adapter's vectors always have.
    fn dimensions(&self) -> usize;
}
