//! Embedding backfill and similarity-edge enrichment.
//!
//! Grounded on the teacher's `EmbeddingSimilarityEnrichment`: batch-embed
//! newly-created nodes, then draw weighted `ConnectsTo` edges from whatever
//! similarity structure falls out — here, the HNSW index's own base-layer
//! adjacency, rather than an all-pairs cosine sweep.

use std::sync::Arc;

use crate::adapter::EmbeddingAdapter;
use crate::error::ErrorKind;
use crate::graph::{Edge, Element, ElementId, ElementKind, GraphEngine, Predicate};
use crate::vector::VectorIndex;

/// Inserts one `TextElement` per `Unit` that doesn't already have one,
/// carrying the unit's original content, and links it via `HasTextElement`.
/// Idempotent: a unit already linked to a `TextElement` is skipped, so
/// re-running enrichment on an already-enriched corpus is a no-op here.
pub async fn insert_text_elements(engine: &GraphEngine, corpus_id: &ElementId) -> Result<usize, ErrorKind> {
    let units = engine.elements_of_kind(corpus_id, ElementKind::Unit).await?;
    let mut inserted = 0;

    for unit in units {
        let already_linked = engine
            .context(corpus_id)
            .map(|ctx| {
                ctx.outgoing_neighbors(&unit.id)
                    .any(|n| ctx.element(n).is_some_and(|e| e.kind == ElementKind::TextElement))
            })
            .unwrap_or(false);
        if already_linked {
            continue;
        }

        let content = unit.content.clone().unwrap_or_else(|| unit.label.clone());
        let text_element =
            Element::new(ElementKind::TextElement, unit.label.clone(), corpus_id.clone()).with_content(content);
        let text_id = engine.upsert_element(corpus_id, text_element).await?;
        engine
            .add_edge(corpus_id, Edge::new(unit.id.clone(), text_id, Predicate::HasTextElement))
            .await?;
        inserted += 1;
    }
    Ok(inserted)
}

/// Embeds every embeddable element in the corpus that doesn't already carry
/// a vector, storing the result both on the element and in `index`.
pub async fn backfill_embeddings(
    engine: &GraphEngine,
    corpus_id: &ElementId,
    embedder: &dyn EmbeddingAdapter,
    index: &Arc<dyn VectorIndex>,
) -> Result<usize, ErrorKind> {
    let embeddable_kinds = [
        ElementKind::TextElement,
        ElementKind::Unit,
        ElementKind::Attribute,
        ElementKind::CommunityElement,
    ];

    let mut embedded = 0;
    for kind in embeddable_kinds {
        let elements = engine.elements_of_kind(corpus_id, kind).await?;
        for mut element in elements {
            if element.embedding.is_some() {
                continue;
            }
            let text = element.content.as_deref().unwrap_or(&element.label);
            let vector = embedder.embed(text).await.map_err(ErrorKind::from)?;
            index
                .insert(corpus_id, element.id.clone(), vector.clone())
                .await
                .map_err(ErrorKind::from)?;
            element.embedding = Some(vector);
            engine.upsert_element(corpus_id, element).await?;
            embedded += 1;
        }
    }
    Ok(embedded)
}

/// Draws `ConnectsTo` edges from the HNSW index's base layer, accumulating
/// weight onto an existing edge between the same pair rather than
/// duplicating (`Context::add_edge`'s merge rule).
pub async fn draw_similarity_edges(
    engine: &GraphEngine,
    corpus_id: &ElementId,
    index: &Arc<dyn VectorIndex>,
) -> Result<usize, ErrorKind> {
    let edges = index.base_layer_edges(corpus_id).await.map_err(ErrorKind::from)?;
    let mut drawn = 0;
    for (a, b, weight) in edges {
        engine
            .add_edge(corpus_id, Edge::connects_to(a, b, "embedding", weight as f64))
            .await?;
        drawn += 1;
    }
    Ok(drawn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MockEmbeddingAdapter;
    use crate::vector::HnswIndex;

    #[tokio::test]
    async fn inserts_one_text_element_per_unit_and_is_idempotent() {
        let engine = GraphEngine::new();
        let corpus = ElementId::from("c1");
        engine
            .upsert_element(&corpus, Element::new(ElementKind::Unit, "u1", corpus.clone()).with_content("hello world"))
            .await
            .unwrap();

        let first = insert_text_elements(&engine, &corpus).await.unwrap();
        assert_eq!(first, 1);
        let texts = engine.elements_of_kind(&corpus, ElementKind::TextElement).await.unwrap();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].content.as_deref(), Some("hello world"));

        let second = insert_text_elements(&engine, &corpus).await.unwrap();
        assert_eq!(second, 0);
        assert_eq!(engine.elements_of_kind(&corpus, ElementKind::TextElement).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn backfill_skips_already_embedded_elements() {
        let engine = GraphEngine::new();
        let corpus = ElementId::from("c1");
        let index: Arc<dyn VectorIndex> = Arc::new(HnswIndex::default());
        let embedder = MockEmbeddingAdapter::new(4);

        engine
            .upsert_element(&corpus, Element::new(ElementKind::Unit, "u1", corpus.clone()).with_content("text one"))
            .await
            .unwrap();
        let already_embedded = Element::new(ElementKind::Unit, "u2", corpus.clone())
            .with_content("text two")
            .with_embedding(vec![1.0, 2.0, 3.0, 4.0]);
        engine.upsert_element(&corpus, already_embedded).await.unwrap();

        let count = backfill_embeddings(&engine, &corpus, &embedder, &index).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn draw_similarity_edges_uses_base_layer() {
        let engine = GraphEngine::new();
        let corpus = ElementId::from("c1");
        let index: Arc<dyn VectorIndex> = Arc::new(HnswIndex::default());
        let embedder = MockEmbeddingAdapter::new(4);

        for i in 0..5 {
            engine
                .upsert_element(&corpus, Element::new(ElementKind::Unit, format!("u{i}"), corpus.clone()).with_content(format!("text {i}")))
                .await
                .unwrap();
        }
        backfill_embeddings(&engine, &corpus, &embedder, &index).await.unwrap();
        let drawn = draw_similarity_edges(&engine, &corpus, &index).await.unwrap();
        assert!(drawn > 0);
    }
}
