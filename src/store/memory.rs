//! A `GraphStore` that keeps everything in memory.
//!
//! Used for tests and for callers who don't need durability. Grounded on the
//! teacher's in-memory fallback pattern (`storage/mod.rs` constructs a
//! no-op store when no path is configured).

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::StoreError;
use crate::graph::{Context, Edge, Element, ElementId};

use super::traits::GraphStore;

#[derive(Default)]
pub struct InMemoryGraphStore {
    contexts: DashMap<ElementId, Context>,
    versions: DashMap<ElementId, AtomicU64>,
    session_state: DashMap<String, String>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self, corpus_id: &ElementId) {
        self.versions
            .entry(corpus_id.clone())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn load_context(&self, corpus_id: &ElementId) -> Result<Option<Context>, StoreError> {
        Ok(self.contexts.get(corpus_id).map(|c| c.clone()))
    }

    async fn save_element(&self, corpus_id: &ElementId, element: &Element) -> Result<(), StoreError> {
        self.contexts
            .entry(corpus_id.clone())
            .or_default()
            .upsert_element(element.clone());
        self.bump(corpus_id);
        Ok(())
    }

    async fn save_edge(&self, corpus_id: &ElementId, edge: &Edge) -> Result<(), StoreError> {
        self.contexts
            .entry(corpus_id.clone())
            .or_default()
            .add_edge(edge.clone());
        self.bump(corpus_id);
        Ok(())
    }

    async fn delete_element(&self, corpus_id: &ElementId, element_id: &ElementId) -> Result<(), StoreError> {
        if let Some(mut ctx) = self.contexts.get_mut(corpus_id) {
            ctx.remove_element(element_id);
        }
        self.bump(corpus_id);
        Ok(())
    }

    async fn data_version(&self, corpus_id: &ElementId) -> Result<u64, StoreError> {
        Ok(self
            .versions
            .get(corpus_id)
            .map(|v| v.load(Ordering::SeqCst))
            .unwrap_or(0))
    }

    async fn save_session_state(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.session_state.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn load_session_state(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.session_state.get(key).map(|v| v.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ElementKind;

    #[tokio::test]
    async fn save_and_load_round_trips() {
        let store = InMemoryGraphStore::new();
        let corpus = ElementId::from("c1");
        let element = Element::new(ElementKind::Entity, "Hinton", corpus.clone());
        store.save_element(&corpus, &element).await.unwrap();
        let ctx = store.load_context(&corpus).await.unwrap().unwrap();
        assert_eq!(ctx.element_count(), 1);
        assert_eq!(store.data_version(&corpus).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn session_state_round_trips() {
        let store = InMemoryGraphStore::new();
        store.save_session_state("k", "v").await.unwrap();
        assert_eq!(store.load_session_state("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(store.load_session_state("missing").await.unwrap(), None);
    }
}
