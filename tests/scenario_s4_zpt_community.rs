//! S4: zoom=community, tilt=graph surfaces the structurally larger
//! community first.

use graphloom::{
    Edge, Element, ElementId, ElementKind, MockEmbeddingAdapter, MockLlmAdapter, Pan, Predicate,
    RetrievalEngine, Tilt, TiltContext, Transform, Zoom,
};

async fn build_clique(engine: &RetrievalEngine, corpus: &ElementId, prefix: &str, count: usize) -> Vec<ElementId> {
    let mut ids = Vec::new();
    for i in 0..count {
        let id = engine
            .graph
            .upsert_element(corpus, Element::new(ElementKind::Entity, format!("{prefix}{i}"), corpus.clone()))
            .await
            .unwrap();
        ids.push(id);
    }
    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            engine
                .graph
                .add_edge(corpus, Edge::new(ids[i].clone(), ids[j].clone(), Predicate::HasSourceEntity))
                .await
                .unwrap();
        }
    }
    ids
}

#[tokio::test]
async fn zpt_community_graph_tilt_surfaces_larger_community() {
    let engine = RetrievalEngine::new();
    let corpus = ElementId::from("s4");
    let embedder = MockEmbeddingAdapter::new(4);

    let mut all_entities = build_clique(&engine, &corpus, "Neuroscience", 14).await;
    all_entities.extend(build_clique(&engine, &corpus, "Linguistics", 6).await);

    let created = graphloom::run_decomposition(
        &engine.graph,
        &corpus,
        MockLlmAdapter::new(),
        &embedder,
        &engine.vector_index,
        "",
        &graphloom::CancellationToken::new(),
    )
    .await
    .unwrap();
    assert_eq!(created.communities_created, 2);

    let communities = engine.graph.elements_of_kind(&corpus, ElementKind::CommunityElement).await.unwrap();
    let big = communities.iter().find(|c| c.label.contains("Neuroscience")).unwrap();
    let small = communities.iter().find(|c| c.label.contains("Linguistics")).unwrap();

    let tilt_ctx = TiltContext {
        graph_seeds: all_entities,
        ..Default::default()
    };
    let result = engine
        .navigate(
            &corpus,
            Zoom::Community,
            Pan::default(),
            Tilt::Graph,
            &tilt_ctx,
            Transform {
                max_tokens: 4000,
                ..Transform::default()
            },
            &MockLlmAdapter::new(),
        )
        .await
        .unwrap();

    assert!(!result.chunks.is_empty());
    let first = &result.chunks[0];
    assert_eq!(first.element_label, big.label);
    assert_ne!(first.element_label, small.label);
}
