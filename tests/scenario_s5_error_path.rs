//! S5: an oversized Pan is rejected before any element is loaded or ranked.

use graphloom::{ElementId, ErrorKind, MockLlmAdapter, Pan, RetrievalEngine, Tilt, TiltContext, Transform, Zoom};

#[tokio::test]
async fn oversized_pan_rejected_without_touching_the_graph() {
    let engine = RetrievalEngine::new();
    let corpus = ElementId::from("s5");

    let pan = Pan {
        keywords: vec!["x".to_string(); Pan::MAX_KEYWORDS + 1],
        ..Default::default()
    };

    let err = engine
        .navigate(
            &corpus,
            Zoom::Entity,
            pan,
            Tilt::Graph,
            &TiltContext::default(),
            Transform::default(),
            &MockLlmAdapter::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ErrorKind::InvalidInput(_)));
    // The corpus was never loaded: nothing was written for a corpus id that
    // doesn't exist yet.
    assert!(engine.graph.context(&corpus).is_none());
}

#[tokio::test]
async fn over_budget_transform_rejected() {
    let engine = RetrievalEngine::new();
    let corpus = ElementId::from("s5b");

    let transform = Transform {
        max_tokens: Transform::MAX_TOKENS + 1,
        ..Transform::default()
    };

    let err = engine
        .navigate(
            &corpus,
            Zoom::Entity,
            Pan::default(),
            Tilt::Graph,
            &TiltContext::default(),
            transform,
            &MockLlmAdapter::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ErrorKind::InvalidInput(_)));
}
