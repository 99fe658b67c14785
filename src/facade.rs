//! `RetrievalEngine`: the single handle an embedder wires up once and calls
//! for everything — decomposing text into the graph, searching it, and
//! navigating it through Zoom/Pan/Tilt/Transform.
//!
//! Grounded on the teacher's top-level `PlexusEngine` + `InputRouter` split:
//! one struct owns the concurrency-safe graph handle and the index, and
//! thin methods delegate to the module that actually does the work rather
//! than re-implementing it here.

use std::sync::Arc;

use crate::adapter::{EmbeddingAdapter, LlmAdapter};
use crate::algo::PprConfig;
use crate::concurrency::CancellationToken;
use crate::config::{ConfigError, EngineConfig};
use crate::decompose::{run_decomposition, DecompositionReport};
use crate::error::ErrorKind;
use crate::graph::{ElementId, GraphEngine};
use crate::navigate::{
    apply_tilt, select_candidates, transform_result, validate_pan, validate_transform, Pan, Tilt,
    TiltContext, Transform, TransformedResult, Zoom,
};
use crate::search::{dual_search, ppr_traverse, DualSearchResult, PprTraversalResult};
use crate::session::SessionApi;
use crate::store::GraphStore;
use crate::vector::{HnswConfig, HnswIndex, VectorIndex};

/// Ties a `GraphEngine`, a `VectorIndex`, and a `SessionApi` to one
/// `EngineConfig`. Construct once per corpus store; every method takes the
/// corpus id explicitly since one engine can serve many corpora.
pub struct RetrievalEngine {
    pub graph: GraphEngine,
    pub vector_index: Arc<dyn VectorIndex>,
    pub sessions: SessionApi,
    config: EngineConfig,
}

impl RetrievalEngine {
    /// An in-memory engine with default configuration. Nothing persists
    /// across process restarts; attach a store with [`Self::with_store`]
    /// when that matters.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default()).expect("default configuration is always valid")
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let hnsw_config: HnswConfig = (&config.vector_index).into();
        Ok(Self {
            graph: GraphEngine::new(),
            vector_index: Arc::new(HnswIndex::new(hnsw_config)),
            sessions: SessionApi::new(),
            config,
        })
    }

    /// An engine backed by a persistent `GraphStore`. Both the graph and the
    /// session history recorded through `self.sessions` are persisted; the
    /// vector index itself is rebuilt in memory from scratch on startup —
    /// callers who need a durable vector index should use
    /// `vector::SqliteVecIndex` directly instead of this constructor.
    pub fn with_store(store: Arc<dyn GraphStore>, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let hnsw_config: HnswConfig = (&config.vector_index).into();
        Ok(Self {
            graph: GraphEngine::with_store(store.clone()),
            vector_index: Arc::new(HnswIndex::new(hnsw_config)),
            sessions: SessionApi::with_store(store),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the full decomposition pipeline over `text`, writing every
    /// element/edge it creates into `corpus_id`.
    pub async fn decompose<L: LlmAdapter>(
        &self,
        corpus_id: &ElementId,
        llm: L,
        embedder: &dyn EmbeddingAdapter,
        text: &str,
        cancellation: &CancellationToken,
    ) -> Result<DecompositionReport, ErrorKind> {
        run_decomposition(&self.graph, corpus_id, llm, embedder, &self.vector_index, text, cancellation).await
    }

    /// Dual Search: an exact-match leg over entities/overviews plus a
    /// vector-similarity leg, run against `corpus_id`.
    pub async fn search(
        &self,
        corpus_id: &ElementId,
        embedder: &dyn EmbeddingAdapter,
        query: &str,
    ) -> Result<DualSearchResult, ErrorKind> {
        dual_search(&self.graph, corpus_id, embedder, &self.vector_index, query).await
    }

    /// Shallow PPR-seeded traversal from `entry_points`, bucketed per kind.
    pub async fn traverse_from(
        &self,
        corpus_id: &ElementId,
        entry_points: &[ElementId],
    ) -> Result<PprTraversalResult, ErrorKind> {
        self.graph.ensure_loaded(corpus_id).await?;
        let ctx = self
            .graph
            .context(corpus_id)
            .ok_or_else(|| ErrorKind::NotFound(corpus_id.to_string()))?;
        ppr_traverse(&ctx, entry_points)
    }

    /// Deep PPR over `corpus_id`'s full context, for callers that want the
    /// raw per-element score vector rather than the top-5-per-kind buckets
    /// `traverse_from` returns.
    pub async fn deep_rank(
        &self,
        corpus_id: &ElementId,
        entry_points: &[ElementId],
    ) -> Result<std::collections::HashMap<ElementId, f64>, ErrorKind> {
        self.graph.ensure_loaded(corpus_id).await?;
        let ctx = self
            .graph
            .context(corpus_id)
            .ok_or_else(|| ErrorKind::NotFound(corpus_id.to_string()))?;
        crate::algo::personalized_pagerank(&ctx, entry_points, PprConfig::deep()).map_err(ErrorKind::from)
    }

    /// Zoom/Pan select candidates, Tilt re-ranks them, Transform shapes the
    /// result to a token budget. The one call a caller needs for a single
    /// navigation step; `session::SessionApi` is separate since not every
    /// caller wants its steps recorded.
    pub async fn navigate(
        &self,
        corpus_id: &ElementId,
        zoom: Zoom,
        pan: Pan,
        tilt: Tilt,
        tilt_ctx: &TiltContext<'_>,
        transform: Transform,
        llm: &dyn LlmAdapter,
    ) -> Result<TransformedResult, ErrorKind> {
        validate_pan(&pan).map_err(|e| ErrorKind::InvalidInput(e.to_string()))?;
        validate_transform(&transform).map_err(|e| ErrorKind::InvalidInput(e.to_string()))?;

        self.graph.ensure_loaded(corpus_id).await?;
        let mut candidates = {
            let ctx = self
                .graph
                .context(corpus_id)
                .ok_or_else(|| ErrorKind::NotFound(corpus_id.to_string()))?;
            select_candidates(&ctx, zoom, &pan, tilt_ctx)
        };
        {
            let ctx = self
                .graph
                .context(corpus_id)
                .ok_or_else(|| ErrorKind::NotFound(corpus_id.to_string()))?;
            apply_tilt(&ctx, tilt, &mut candidates, tilt_ctx);
        }
        Ok(transform_result(candidates, &transform, llm).await)
    }
}

impl Default for RetrievalEngine {
    fn default() -> Self {
        Self::new()
    }
}
