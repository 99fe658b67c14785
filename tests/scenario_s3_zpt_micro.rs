//! S3: zoom=micro, tilt=keywords, a small token budget stays within budget
//! and pulls chunks sourced from TextElements.

use graphloom::{
    CancellationToken, ElementId, ElementKind, MockEmbeddingAdapter, MockLlmAdapter, Pan, RetrievalEngine,
    Tilt, TiltContext, Transform, Zoom,
};

#[tokio::test]
async fn zpt_micro_keywords_stays_within_budget() {
    let engine = RetrievalEngine::new();
    let corpus = ElementId::from("s3");
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

    let text_elements = engine.graph.elements_of_kind(&corpus, ElementKind::TextElement).await.unwrap();
    assert_eq!(text_elements.len(), 2);
    let text_labels: Vec<&str> = text_elements.iter().map(|e| e.label.as_str()).collect();

    let transform = Transform {
        max_tokens: 400,
        ..Transform::default()
    };
    let tilt_ctx = TiltContext {
        keywords: vec!["backpropagation".to_string()],
        query_vector: None,
    };

    let result = engine
        .navigate(
            &corpus,
            Zoom::Micro,
            Pan::default(),
            Tilt::Keywords,
            &tilt_ctx,
            transform,
            &MockLlmAdapter::new(),
        )
        .await
        .unwrap();

    assert!(!result.chunks.is_empty());
    for chunk in &result.chunks {
        assert!(text_labels.contains(&chunk.element_label.as_str()));
    }
    assert!(result.total_tokens <= 400);
}
