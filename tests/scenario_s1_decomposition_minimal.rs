//! S1: decomposing a single chunk produces the expected Unit, Entities, and
//! Relationship.

use graphloom::{
    CancellationToken, ElementId, ElementKind, MockEmbeddingAdapter, MockLlmAdapter, RetrievalEngine,
};

#[tokio::test]
async fn decomposition_minimal() {
    let engine = RetrievalEngine::new();
    let corpus = ElementId::from("s1");
    let embedder = MockEmbeddingAdapter::new(4);

    let report = engine
        .decompose(
            &corpus,
            MockLlmAdapter::new(),
            &embedder,
            "Hinton was awarded the Nobel Prize for inventing backpropagation.",
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(report.extraction.units.len(), 1);
    let units = engine.graph.elements_of_kind(&corpus, ElementKind::Unit).await.unwrap();
    assert_eq!(units.len(), 1);
    let unit_content = units[0].content.as_deref().unwrap();
    assert!(unit_content.contains("Hinton"));
    assert!(unit_content.contains("Nobel Prize"));

    let entities = engine.graph.elements_of_kind(&corpus, ElementKind::Entity).await.unwrap();
    let labels: Vec<&str> = entities.iter().map(|e| e.label.as_str()).collect();
    assert!(labels.contains(&"Hinton"));
    assert!(labels.contains(&"Nobel Prize"));

    let relationships = engine.graph.elements_of_kind(&corpus, ElementKind::Relationship).await.unwrap();
    assert_eq!(relationships.len(), 1);
    assert_eq!(report.extraction.relationships.len(), 1);

    let hinton = entities.iter().find(|e| e.label == "Hinton").unwrap();
    let nobel = entities.iter().find(|e| e.label == "Nobel Prize").unwrap();
    let ctx = engine.graph.context(&corpus).unwrap();
    assert!(ctx.outgoing_neighbors(&hinton.id).any(|n| *n == relationships[0].id));
    assert!(ctx.outgoing_neighbors(&relationships[0].id).any(|n| *n == nobel.id));
}
