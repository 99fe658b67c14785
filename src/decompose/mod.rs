//! Turns raw corpus text into the graph: extraction, augmentation,
//! community aggregation, enrichment.
//!
//! Grounded on the teacher's `AnalysisOrchestrator`: a semaphore-gated LLM
//! call per stage, sequential deterministic post-processing in between, and
//! a per-stage error-isolation policy (a stage's own failure is logged and
//! skipped rather than aborting the whole pipeline).

mod augment;
mod community;
mod enrich;
mod extract;
mod pipeline;

pub use augment::augment_entities;
pub use community::aggregate_communities;
pub use enrich::{backfill_embeddings, draw_similarity_edges, insert_text_elements};
pub use extract::{extract_units_and_entities, ExtractionOutcome};
pub use pipeline::{run_decomposition, DecompositionReport};
