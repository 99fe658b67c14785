//! The `VectorIndex` trait: the similarity-search seam.

use async_trait::async_trait;

use crate::error::VectorError;
use crate::graph::ElementId;

/// An element id paired with its similarity score to some query vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredElement {
    pub id: ElementId,
    pub score: f32,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Inserts or replaces the vector for an element within a corpus.
    async fn insert(&self, corpus_id: &ElementId, element_id: ElementId, vector: Vec<f32>) -> Result<(), VectorError>;

    async fn remove(&self, corpus_id: &ElementId, element_id: &ElementId) -> Result<(), VectorError>;

    /// Top-`k` nearest neighbors to `query` within a corpus, highest score first.
    async fn search(
        &self,
        corpus_id: &ElementId,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredElement>, VectorError>;

    /// The pairwise edges the index's base layer would draw if materialized
    /// as a graph — used by `decompose::enrich` to seed `ConnectsTo` edges
    /// from whatever similarity structure the index already built.
    async fn base_layer_edges(&self, corpus_id: &ElementId) -> Result<Vec<(ElementId, ElementId, f32)>, VectorError>;
}
