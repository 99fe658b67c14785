//! k-core decomposition over the entity/unit bipartite-like subgraph.
//!
//! Entities are ranked by how deeply embedded they are in the corpus: an
//! entity's degree counts only its edges to `Unit` and `Relationship`
//! elements (direct entity-to-entity edges don't count), then standard
//! k-core peeling assigns each entity a core number. The threshold `k` is
//! derived from corpus size so a tiny corpus doesn't get peeled to nothing:
//! `k = floor(ln(|V|) * sqrt(avg_degree))`.

use std::collections::{HashMap, HashSet};

use crate::error::AlgoError;
use crate::graph::{Context, ElementId, ElementKind};

#[derive(Debug, Clone)]
pub struct KCoreResult {
    pub core_number: HashMap<ElementId, usize>,
    pub threshold: usize,
}

fn entity_degree_graph(ctx: &Context) -> HashMap<ElementId, HashSet<ElementId>> {
    let entities: HashSet<ElementId> = ctx
        .elements_of_kind(ElementKind::Entity)
        .map(|e| e.id.clone())
        .collect();

    let mut adjacency: HashMap<ElementId, HashSet<ElementId>> =
        entities.iter().cloned().map(|id| (id, HashSet::new())).collect();

    for edge in ctx.all_edges() {
        let source_is_entity = entities.contains(&edge.source);
        let target_is_entity = entities.contains(&edge.target);
        let (entity_id, other_id) = if source_is_entity && !target_is_entity {
            (edge.source.clone(), edge.target.clone())
        } else if target_is_entity && !source_is_entity {
            (edge.target.clone(), edge.source.clone())
        } else {
            continue;
        };
        let other_kind = ctx.element(&other_id).map(|e| e.kind);
        if matches!(other_kind, Some(ElementKind::Unit) | Some(ElementKind::Relationship)) {
            // Link two entities that share a unit/relationship neighbor, one
            // hop removed, so degree reflects co-occurrence depth rather
            // than raw edge count to a single shared node.
            for candidate in ctx.incoming_neighbors(&other_id).chain(ctx.outgoing_neighbors(&other_id)) {
                if *candidate != entity_id && entities.contains(candidate) {
                    adjacency.entry(entity_id.clone()).or_default().insert(candidate.clone());
                    adjacency.entry(candidate.clone()).or_default().insert(entity_id.clone());
                }
            }
        }
    }
    adjacency
}

/// Peels the entity co-occurrence graph down to its core numbers.
pub fn important_entities(ctx: &Context) -> Result<KCoreResult, AlgoError> {
    let adjacency = entity_degree_graph(ctx);
    if adjacency.is_empty() {
        return Err(AlgoError::EmptyGraph);
    }

    let n = adjacency.len();
    let total_degree: usize = adjacency.values().map(|s| s.len()).sum();
    let avg_degree = total_degree as f64 / n as f64;
    let threshold = ((n as f64).ln() * avg_degree.sqrt()).floor().max(0.0) as usize;

    let mut degree: HashMap<ElementId, usize> =
        adjacency.iter().map(|(id, neighbors)| (id.clone(), neighbors.len())).collect();
    let mut core_number: HashMap<ElementId, usize> = HashMap::new();
    let mut remaining: HashSet<ElementId> = adjacency.keys().cloned().collect();

    let mut k = 0;
    while !remaining.is_empty() {
        loop {
            let peel: Vec<ElementId> = remaining
                .iter()
                .filter(|id| degree.get(*id).copied().unwrap_or(0) <= k)
                .cloned()
                .collect();
            if peel.is_empty() {
                break;
            }
            for id in &peel {
                core_number.insert(id.clone(), k);
                remaining.remove(id);
                if let Some(neighbors) = adjacency.get(id) {
                    for n in neighbors {
                        if remaining.contains(n) {
                            if let Some(d) = degree.get_mut(n) {
                                *d = d.saturating_sub(1);
                            }
                        }
                    }
                }
            }
        }
        k += 1;
    }

    Ok(KCoreResult {
        core_number,
        threshold,
    })
}

impl KCoreResult {
    /// Entities whose core number meets or exceeds the size-derived threshold.
    pub fn important(&self) -> Vec<ElementId> {
        self.core_number
            .iter()
            .filter(|(_, core)| **core >= self.threshold)
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Element, Predicate};

    fn entity(ctx: &mut Context, label: &str) -> ElementId {
        ctx.upsert_element(Element::new(ElementKind::Entity, label, ElementId::from("c1")))
    }

    fn unit(ctx: &mut Context, label: &str) -> ElementId {
        ctx.upsert_element(Element::new(ElementKind::Unit, label, ElementId::from("c1")))
    }

    #[test]
    fn empty_graph_errors() {
        let ctx = Context::new();
        assert!(matches!(important_entities(&ctx), Err(AlgoError::EmptyGraph)));
    }

    #[test]
    fn entities_sharing_a_unit_are_linked() {
        let mut ctx = Context::new();
        let a = entity(&mut ctx, "a");
        let b = entity(&mut ctx, "b");
        let u = unit(&mut ctx, "u1");
        ctx.add_edge(Edge::new(a.clone(), u.clone(), Predicate::HasSourceEntity));
        ctx.add_edge(Edge::new(b.clone(), u.clone(), Predicate::HasSourceEntity));

        let result = important_entities(&ctx).unwrap();
        assert_eq!(result.core_number.len(), 2);
    }

    #[test]
    fn direct_entity_edges_do_not_count() {
        let mut ctx = Context::new();
        let a = entity(&mut ctx, "a");
        let b = entity(&mut ctx, "b");
        ctx.add_edge(Edge::connects_to(a, b, "embedding", 1.0));
        let result = important_entities(&ctx).unwrap();
        assert_eq!(result.core_number.values().max().copied().unwrap_or(0), 0);
    }
}
