//! Attribute synthesis: entities that matter structurally (deep in the
//! k-core, or high betweenness) get an LLM-written `Attribute` summarizing
//! what the corpus says about them — work worth spending an LLM call on is
//! reserved for entities the graph itself says are important, rather than
//! summarizing every entity indiscriminately.

use std::collections::HashSet;

use crate::adapter::LlmAdapter;
use crate::algo::{betweenness_centrality, important_entities};
use crate::error::ErrorKind;
use crate::graph::{Edge, Element, ElementId, ElementKind, GraphEngine, Predicate};

const BETWEENNESS_SAMPLES: usize = 10;
const BETWEENNESS_SEED: u64 = 42;

/// Synthesizes one `Attribute` element per structurally-important entity,
/// linked to it via `HasAttribute`. Returns the ids of the attributes
/// created. A corpus too small or too sparse for either algorithm to run
/// (e.g. no entities yet) simply produces no attributes rather than erroring.
pub async fn augment_entities(
    engine: &GraphEngine,
    corpus_id: &ElementId,
    llm: &dyn LlmAdapter,
) -> Result<Vec<ElementId>, ErrorKind> {
    let important = {
        let Some(ctx) = engine.context(corpus_id) else {
            return Ok(Vec::new());
        };
        let mut important: HashSet<ElementId> = important_entities(&ctx)
            .map(|r| r.important().into_iter().collect())
            .unwrap_or_default();
        important.extend(
            betweenness_centrality(&ctx, BETWEENNESS_SAMPLES, BETWEENNESS_SEED)
                .map(|r| r.important())
                .unwrap_or_default(),
        );
        important
    };

    let mut created = Vec::new();
    for entity_id in important {
        let Some(entity) = engine.context(corpus_id).and_then(|ctx| ctx.element(&entity_id).cloned()) else {
            continue;
        };
        let summary = llm
            .complete(&format!("Summarize what is known about {}.", entity.label))
            .await
            .unwrap_or_else(|_| format!("No summary available for {}.", entity.label));

        let attribute = Element::new(ElementKind::Attribute, format!("{} summary", entity.label), corpus_id.clone())
            .with_content(summary);
        let attribute_id = engine.upsert_element(corpus_id, attribute).await?;
        engine
            .add_edge(corpus_id, Edge::new(entity_id, attribute_id.clone(), Predicate::HasAttribute))
            .await?;
        created.push(attribute_id);
    }
    Ok(created)
}
