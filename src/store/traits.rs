//! The `GraphStore` trait: the persistence seam every backend implements.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::graph::{Context, Edge, Element, ElementId};

/// A persistence backend for graph data, keyed by corpus id.
///
/// Implementations must be safe to share across tasks (`Send + Sync`) since
/// `GraphEngine` holds one behind an `Arc` and calls it from many tasks at
/// once.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Loads the full context for a corpus, or `None` if the corpus has
    /// never been persisted.
    async fn load_context(&self, corpus_id: &ElementId) -> Result<Option<Context>, StoreError>;

    async fn save_element(&self, corpus_id: &ElementId, element: &Element) -> Result<(), StoreError>;

    async fn save_edge(&self, corpus_id: &ElementId, edge: &Edge) -> Result<(), StoreError>;

    async fn delete_element(&self, corpus_id: &ElementId, element_id: &ElementId) -> Result<(), StoreError>;

    /// A backend-local monotonic counter, bumped on every write. Used to
    /// detect external changes to a corpus that this process didn't make
    /// (e.g. another process sharing the same SQLite file).
    async fn data_version(&self, corpus_id: &ElementId) -> Result<u64, StoreError>;

    /// Persists opaque session/view state (navigation history) under a
    /// caller-chosen key, so `session::api` doesn't need its own backend.
    async fn save_session_state(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn load_session_state(&self, key: &str) -> Result<Option<String>, StoreError>;
}
