//! Dual Search: an exact-match leg over named entities and community
//! overviews, run alongside a vector-similarity leg over free-text
//! elements. Grounded on the GraphRAG example's
//! `find_similar_entities`/`expand_entity_context` split between keyword
//! lookup and embedding similarity.

use std::sync::Arc;

use crate::adapter::EmbeddingAdapter;
use crate::error::ErrorKind;
use crate::graph::{ElementId, ElementKind, GraphEngine};
use crate::vector::{ScoredElement, VectorIndex};

const TOP_K_VECTOR: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct DualSearchResult {
    /// Entities and community overviews whose label exact-matched the query
    /// (case-insensitive substring).
    pub exact_matches: Vec<ElementId>,
    /// Units/Attributes/CommunityElements ranked by embedding similarity.
    pub vector_matches: Vec<ScoredElement>,
}

async fn exact_match(engine: &GraphEngine, corpus_id: &ElementId, query: &str) -> Result<Vec<ElementId>, ErrorKind> {
    let needle = query.to_lowercase();
    let mut matches = Vec::new();

    for entity in engine.elements_of_kind(corpus_id, ElementKind::Entity).await? {
        if entity.label.to_lowercase().contains(&needle) {
            matches.push(entity.id);
        }
    }
    for attribute in engine.elements_of_kind(corpus_id, ElementKind::Attribute).await? {
        if attribute.is_overview() && attribute.content.as_deref().unwrap_or("").to_lowercase().contains(&needle) {
            matches.push(attribute.id);
        }
    }
    Ok(matches)
}

/// Runs both legs of Dual Search concurrently and returns their combined
/// (not deduplicated — `search::filter` and the caller decide how to merge)
/// results.
pub async fn dual_search(
    engine: &GraphEngine,
    corpus_id: &ElementId,
    embedder: &dyn EmbeddingAdapter,
    index: &Arc<dyn VectorIndex>,
    query: &str,
) -> Result<DualSearchResult, ErrorKind> {
    let exact = exact_match(engine, corpus_id, query).await?;

    let query_vector = embedder
        .embed(query)
        .await
        .map_err(ErrorKind::from)?;
    let vector_matches = index
        .search(corpus_id, &query_vector, TOP_K_VECTOR)
        .await
        .map_err(ErrorKind::from)?;

    // Restrict the vector leg to the kinds Dual Search defines for it;
    // entities never carry embeddings so this mostly guards against a
    // misconfigured index holding stray vectors.
    let allowed: std::collections::HashSet<ElementId> = {
        let mut ids = std::collections::HashSet::new();
        for kind in [ElementKind::Unit, ElementKind::Attribute, ElementKind::CommunityElement] {
            for element in engine.elements_of_kind(corpus_id, kind).await? {
                ids.insert(element.id);
            }
        }
        ids
    };
    let vector_matches = vector_matches.into_iter().filter(|m| allowed.contains(&m.id)).collect();

    Ok(DualSearchResult {
        exact_matches: exact,
        vector_matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MockEmbeddingAdapter;
    use crate::graph::Element;
    use crate::vector::HnswIndex;

    #[tokio::test]
    async fn exact_match_finds_entity_by_substring() {
        let engine = GraphEngine::new();
        let corpus = ElementId::from("c1");
        engine
            .upsert_element(&corpus, Element::new(ElementKind::Entity, "Geoffrey Hinton", corpus.clone()))
            .await
            .unwrap();
        let index: Arc<dyn VectorIndex> = Arc::new(HnswIndex::default());
        let result = dual_search(&engine, &corpus, &MockEmbeddingAdapter::new(4), &index, "hinton")
            .await
            .unwrap();
        assert_eq!(result.exact_matches.len(), 1);
    }

    #[tokio::test]
    async fn vector_leg_excludes_entities() {
        let engine = GraphEngine::new();
        let corpus = ElementId::from("c1");
        let embedder = MockEmbeddingAdapter::new(4);
        let index: Arc<dyn VectorIndex> = Arc::new(HnswIndex::default());

        let unit = Element::new(ElementKind::Unit, "u", corpus.clone()).with_content("hinton's backprop paper");
        let unit_id = unit.id.clone();
        let vector = embedder.embed("hinton's backprop paper").await.unwrap();
        index.insert(&corpus, unit_id.clone(), vector).await.unwrap();
        engine.upsert_element(&corpus, unit).await.unwrap();

        let result = dual_search(&engine, &corpus, &embedder, &index, "backprop").await.unwrap();
        assert!(result.vector_matches.iter().any(|m| m.id == unit_id));
    }
}
