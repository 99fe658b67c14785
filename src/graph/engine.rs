//! `GraphEngine`: the concurrent, optionally-persistent front door to the
//! graph data model.
//!
//! Grounded on the teacher's `PlexusEngine`: a `DashMap` of per-corpus
//! contexts in front of an optional `Arc<dyn GraphStore>`, with a monotonic
//! `data_version` counter so callers can detect whether their view is stale
//! without re-reading the whole graph.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::one::Ref;

use crate::error::ErrorKind;
use crate::store::GraphStore;

use super::context::Context;
use super::edge::Edge;
use super::element::{Element, ElementKind};
use super::id::ElementId;

/// Shared, concurrency-safe handle onto the graph. Cheap to clone (it's an
/// `Arc` internally via `DashMap` + `Arc<dyn GraphStore>`); intended to be
/// held by every component that needs graph access (`decompose`, `search`,
/// `navigate`, `session`).
pub struct GraphEngine {
    contexts: DashMap<ElementId, Context>,
    store: Option<Arc<dyn GraphStore>>,
    data_version: AtomicU64,
}

impl GraphEngine {
    pub fn new() -> Self {
        Self {
            contexts: DashMap::new(),
            store: None,
            data_version: AtomicU64::new(0),
        }
    }

    pub fn with_store(store: Arc<dyn GraphStore>) -> Self {
        Self {
            contexts: DashMap::new(),
            store: Some(store),
            data_version: AtomicU64::new(0),
        }
    }

    /// Monotonic counter bumped on every mutation. Callers comparing a
    /// previously-observed value against the current one can tell whether
    /// their cached view needs refreshing, without re-diffing the graph.
    pub fn data_version(&self) -> u64 {
        self.data_version.load(Ordering::SeqCst)
    }

    fn bump_version(&self) {
        self.data_version.fetch_add(1, Ordering::SeqCst);
    }

    /// Loads a corpus's context from the backing store into memory if it
    /// isn't already resident. No-op for a purely in-memory engine.
    pub async fn ensure_loaded(&self, corpus_id: &ElementId) -> Result<(), ErrorKind> {
        if self.contexts.contains_key(corpus_id) {
            return Ok(());
        }
        let ctx = match &self.store {
            Some(store) => store.load_context(corpus_id).await?.unwrap_or_default(),
            None => Context::new(),
        };
        self.contexts.insert(corpus_id.clone(), ctx);
        Ok(())
    }

    pub fn context(&self, corpus_id: &ElementId) -> Option<Ref<'_, ElementId, Context>> {
        self.contexts.get(corpus_id)
    }

    /// Inserts or updates an element, persisting it if a store is attached.
    pub async fn upsert_element(
        &self,
        corpus_id: &ElementId,
        element: Element,
    ) -> Result<ElementId, ErrorKind> {
        self.ensure_loaded(corpus_id).await?;
        if let Some(store) = &self.store {
            store.save_element(corpus_id, &element).await?;
        }
        let id = {
            let mut ctx = self
                .contexts
                .get_mut(corpus_id)
                .ok_or_else(|| ErrorKind::NotFound(corpus_id.to_string()))?;
            ctx.upsert_element(element)
        };
        self.bump_version();
        Ok(id)
    }

    pub async fn add_edge(&self, corpus_id: &ElementId, edge: Edge) -> Result<ElementId, ErrorKind> {
        self.ensure_loaded(corpus_id).await?;
        if let Some(store) = &self.store {
            store.save_edge(corpus_id, &edge).await?;
        }
        let id = {
            let mut ctx = self
                .contexts
                .get_mut(corpus_id)
                .ok_or_else(|| ErrorKind::NotFound(corpus_id.to_string()))?;
            ctx.add_edge(edge)
        };
        self.bump_version();
        Ok(id)
    }

    pub async fn find_entity_by_label(
        &self,
        corpus_id: &ElementId,
        label: &str,
    ) -> Result<Option<Element>, ErrorKind> {
        self.ensure_loaded(corpus_id).await?;
        Ok(self
            .contexts
            .get(corpus_id)
            .and_then(|ctx| ctx.find_entity_by_label(label).cloned()))
    }

    pub async fn elements_of_kind(
        &self,
        corpus_id: &ElementId,
        kind: ElementKind,
    ) -> Result<Vec<Element>, ErrorKind> {
        self.ensure_loaded(corpus_id).await?;
        Ok(self
            .contexts
            .get(corpus_id)
            .map(|ctx| ctx.elements_of_kind(kind).cloned().collect())
            .unwrap_or_default())
    }

    pub async fn element_count(&self, corpus_id: &ElementId) -> Result<usize, ErrorKind> {
        self.ensure_loaded(corpus_id).await?;
        Ok(self
            .contexts
            .get(corpus_id)
            .map(|ctx| ctx.element_count())
            .unwrap_or(0))
    }
}

impl Default for GraphEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_then_find_round_trips() {
        let engine = GraphEngine::new();
        let corpus = ElementId::from("corpus:1");
        let before = engine.data_version();
        engine
            .upsert_element(&corpus, Element::new(ElementKind::Entity, "Hinton", corpus.clone()))
            .await
            .unwrap();
        assert!(engine.data_version() > before);
        let found = engine.find_entity_by_label(&corpus, "hinton").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn distinct_corpora_stay_isolated() {
        let engine = GraphEngine::new();
        let c1 = ElementId::from("corpus:1");
        let c2 = ElementId::from("corpus:2");
        engine
            .upsert_element(&c1, Element::new(ElementKind::Entity, "Hinton", c1.clone()))
            .await
            .unwrap();
        assert_eq!(engine.element_count(&c1).await.unwrap(), 1);
        assert_eq!(engine.element_count(&c2).await.unwrap(), 0);
    }
}
