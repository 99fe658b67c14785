//! The full decomposition pipeline, stitching extraction, augmentation,
//! community aggregation, and enrichment into one call.
//!
//! Grounded on the teacher's `AnalysisOrchestrator::run`: stages execute in
//! a fixed sequence, a cancellation check happens between stages rather
//! than mid-stage, and a stage's own failure is recorded as a warning in the
//! report instead of aborting the whole run.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::adapter::{EmbeddingAdapter, LlmAdapter};
use crate::concurrency::{BoundedAdapter, CancellationToken};
use crate::error::ErrorKind;
use crate::graph::{ElementId, GraphEngine};
use crate::vector::VectorIndex;

use super::augment::augment_entities;
use super::community::aggregate_communities;
use super::enrich::{backfill_embeddings, draw_similarity_edges, insert_text_elements};
use super::extract::{extract_units_and_entities, ExtractionOutcome};

#[derive(Debug, Clone, Default)]
pub struct DecompositionReport {
    pub extraction: ExtractionOutcome,
    pub attributes_created: usize,
    pub communities_created: usize,
    pub text_elements_inserted: usize,
    pub embeddings_backfilled: usize,
    pub similarity_edges_drawn: usize,
    pub warnings: Vec<String>,
}

/// Runs the full pipeline over `text`, writing every created element/edge
/// into `corpus_id` via `engine`. Returns a report even if later stages are
/// skipped due to cancellation or an isolated stage failure — callers that
/// need all-or-nothing semantics should check `report.warnings.is_empty()`.
pub async fn run_decomposition<L: LlmAdapter>(
    engine: &GraphEngine,
    corpus_id: &ElementId,
    llm: L,
    embedder: &dyn EmbeddingAdapter,
    index: &Arc<dyn VectorIndex>,
    text: &str,
    cancellation: &CancellationToken,
) -> Result<DecompositionReport, ErrorKind> {
    let bounded_llm = BoundedAdapter::new(llm, 4, Duration::from_secs(30));
    let mut report = DecompositionReport::default();

    report.extraction = extract_units_and_entities(engine, corpus_id, &bounded_llm, text).await?;

    if cancellation.is_cancelled() {
        report.warnings.push("cancelled before augmentation".to_string());
        return Ok(report);
    }
    match augment_entities(engine, corpus_id, &bounded_llm).await {
        Ok(created) => report.attributes_created = created.len(),
        Err(e) => {
            warn!(error = %e, "augmentation stage failed, continuing without entity attributes");
            report.warnings.push(format!("augmentation failed: {e}"));
        }
    }

    if cancellation.is_cancelled() {
        report.warnings.push("cancelled before community aggregation".to_string());
        return Ok(report);
    }
    match aggregate_communities(engine, corpus_id, &bounded_llm, embedder).await {
        Ok(created) => report.communities_created = created.len(),
        Err(e) => {
            warn!(error = %e, "community aggregation failed, continuing without communities");
            report.warnings.push(format!("community aggregation failed: {e}"));
        }
    }

    if cancellation.is_cancelled() {
        report.warnings.push("cancelled before embedding enrichment".to_string());
        return Ok(report);
    }
    match insert_text_elements(engine, corpus_id).await {
        Ok(count) => report.text_elements_inserted = count,
        Err(e) => {
            warn!(error = %e, "text element insertion failed, continuing without them");
            report.warnings.push(format!("text element insertion failed: {e}"));
        }
    }
    match backfill_embeddings(engine, corpus_id, embedder, index).await {
        Ok(count) => {
            report.embeddings_backfilled = count;
            match draw_similarity_edges(engine, corpus_id, index).await {
                Ok(drawn) => report.similarity_edges_drawn = drawn,
                Err(e) => {
                    warn!(error = %e, "drawing similarity edges failed");
                    report.warnings.push(format!("similarity edges failed: {e}"));
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "embedding backfill failed, continuing without vector enrichment");
            report.warnings.push(format!("embedding backfill failed: {e}"));
        }
    }

    Ok(report)
}
