//! Unit/entity/relationship extraction from raw corpus text.
//!
//! Entity and relationship extraction follow the keyword-heuristic pattern
//! from the pack's GraphRAG example (capitalized-phrase spotting, paired
//! co-occurrence inside a unit) rather than inventing an NLP pipeline from
//! nothing; the LLM adapter refines each candidate label, the same
//! division of labor the teacher's analyzer/LLM split uses elsewhere.
//!
//! Entity resolution is serialized per case-folded label via a keyed mutex
//! table, so two units naming the same entity within one decomposition run
//! race onto a single `upsert`, not a duplicate.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex as AsyncMutex;

use crate::adapter::LlmAdapter;
use crate::error::ErrorKind;
use crate::graph::{Edge, Element, ElementId, ElementKind, GraphEngine, Predicate};

#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    pub units: Vec<ElementId>,
    pub entities: Vec<ElementId>,
    pub relationships: Vec<ElementId>,
}

/// Serializes entity find-or-create by normalized label within one process.
/// Scoped to a single decomposition call rather than held globally, since
/// each call already holds its own `GraphEngine` reference.
struct EntityLocks {
    locks: DashMap<String, Arc<AsyncMutex<()>>>,
}

impl EntityLocks {
    fn new() -> Self {
        Self { locks: DashMap::new() }
    }

    fn lock_for(&self, label: &str) -> Arc<AsyncMutex<()>> {
        self.locks
            .entry(label.to_lowercase())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

fn split_units(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Spots capitalized multi-word phrases as entity candidates — the same
/// keyword heuristic the GraphRAG example uses before handing candidates to
/// an LLM for refinement.
fn candidate_entities(unit: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for word in unit.split_whitespace() {
        let clean = word.trim_matches(|c: char| !c.is_alphanumeric());
        if clean.chars().next().is_some_and(|c| c.is_uppercase()) && clean.len() > 1 {
            current.push(clean);
        } else if !current.is_empty() {
            candidates.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        candidates.push(current.join(" "));
    }
    candidates.sort();
    candidates.dedup();
    candidates
}

async fn resolve_entity(
    engine: &GraphEngine,
    corpus_id: &ElementId,
    locks: &EntityLocks,
    llm: &dyn LlmAdapter,
    label: &str,
) -> Result<ElementId, ErrorKind> {
    let lock = locks.lock_for(label);
    let _guard = lock.lock().await;

    if let Some(existing) = engine.find_entity_by_label(corpus_id, label).await? {
        return Ok(existing.id);
    }

    // Ask the LLM to normalize the surface form (e.g. collapse "Dr. Hinton"
    // and "Geoffrey Hinton" to one canonical label); fall back to the raw
    // candidate if the adapter declines or returns something implausible
    // (e.g. an echo of the whole prompt rather than a short label).
    let canonical = llm
        .complete(&format!("Canonicalize this entity mention: {label}"))
        .await
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s.split_whitespace().count() <= 4)
        .unwrap_or_else(|| label.to_string());

    if let Some(existing) = engine.find_entity_by_label(corpus_id, &canonical).await? {
        return Ok(existing.id);
    }

    engine
        .upsert_element(corpus_id, Element::new(ElementKind::Entity, canonical, corpus_id.clone()))
        .await
}

/// Decomposes `text` into `Unit` elements, extracts `Entity` elements from
/// each unit, and links co-occurring entity pairs within a unit through a
/// `Relationship` element (not a direct edge — relationships are
/// first-class nodes so they can carry their own attributes later).
pub async fn extract_units_and_entities(
    engine: &GraphEngine,
    corpus_id: &ElementId,
    llm: &dyn LlmAdapter,
    text: &str,
) -> Result<ExtractionOutcome, ErrorKind> {
    let locks = EntityLocks::new();
    let mut outcome = ExtractionOutcome::default();
    let mut entity_cache: HashMap<String, ElementId> = HashMap::new();

    for unit_text in split_units(text) {
        let unit_id = engine
            .upsert_element(
                corpus_id,
                Element::new(ElementKind::Unit, unit_text.chars().take(60).collect::<String>(), corpus_id.clone())
                    .with_content(unit_text.clone()),
            )
            .await?;
        outcome.units.push(unit_id.clone());

        let mut unit_entities = Vec::new();
        for label in candidate_entities(&unit_text) {
            let id = if let Some(id) = entity_cache.get(&label.to_lowercase()) {
                id.clone()
            } else {
                let id = resolve_entity(engine, corpus_id, &locks, llm, &label).await?;
                entity_cache.insert(label.to_lowercase(), id.clone());
                outcome.entities.push(id.clone());
                id
            };
            engine
                .add_edge(corpus_id, Edge::new(id.clone(), unit_id.clone(), Predicate::HasSourceEntity))
                .await?;
            unit_entities.push(id);
        }

        for pair in unit_entities.windows(2) {
            let relationship_label = format!("relates {} to {}", pair[0], pair[1]);
            let relationship_id = engine
                .upsert_element(
                    corpus_id,
                    Element::new(ElementKind::Relationship, relationship_label, corpus_id.clone())
                        .with_content(unit_text.clone()),
                )
                .await?;
            engine
                .add_edge(corpus_id, Edge::new(pair[0].clone(), relationship_id.clone(), Predicate::HasSourceEntity))
                .await?;
            engine
                .add_edge(corpus_id, Edge::new(relationship_id.clone(), pair[1].clone(), Predicate::HasTargetEntity))
                .await?;
            outcome.relationships.push(relationship_id);
        }
    }

    Ok(outcome)
}
