//! External adapters the decomposition/augmentation pipeline calls through:
//! an LLM for extraction/summarization prompts, an embedding model for
//! vectors. Grounded on the teacher's `adapter::traits::Adapter` seam, split
//! into two narrower traits since this pipeline's two external calls have
//! unrelated signatures.

mod mock;
mod traits;

pub use mock::{MockEmbeddingAdapter, MockLlmAdapter};
pub use traits::{EmbeddingAdapter, LlmAdapter};
