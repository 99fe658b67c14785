//! Sampled Brandes betweenness centrality.
//!
//! Ported from the corpus's generic `GraphQuery::betweenness_centrality`
//! (BFS shortest-path counting + back-propagation of dependency), adapted
//! to sample a fixed number of source nodes instead of running from every
//! node, since this runs on every decomposition rather than offline.

use std::collections::{HashMap, VecDeque};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::AlgoError;
use crate::graph::{Context, ElementId, ElementKind};

#[derive(Debug, Clone)]
pub struct BetweennessResult {
    pub scores: HashMap<ElementId, f64>,
    /// Score threshold above which an entity counts as "important":
    /// `avg(scores) * floor(log10(|V|))`.
    pub threshold: f64,
}

impl BetweennessResult {
    pub fn important(&self) -> Vec<ElementId> {
        self.scores
            .iter()
            .filter(|(_, s)| **s > self.threshold)
            .map(|(id, _)| id.clone())
            .collect()
    }
}

fn entity_ids(ctx: &Context) -> Vec<ElementId> {
    ctx.elements_of_kind(ElementKind::Entity).map(|e| e.id.clone()).collect()
}

/// Runs Brandes' algorithm from `samples` randomly chosen source entities
/// (all of them if the corpus has fewer than `samples`), seeded by
/// `seed` so results are reproducible for a fixed corpus snapshot.
pub fn betweenness_centrality(ctx: &Context, samples: usize, seed: u64) -> Result<BetweennessResult, AlgoError> {
    let nodes = entity_ids(ctx);
    if nodes.is_empty() {
        return Err(AlgoError::EmptyGraph);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut sources = nodes.clone();
    sources.shuffle(&mut rng);
    sources.truncate(samples.min(nodes.len()).max(1));

    let node_set: std::collections::HashSet<&ElementId> = nodes.iter().collect();
    let mut scores: HashMap<ElementId, f64> = nodes.iter().cloned().map(|id| (id, 0.0)).collect();

    for source in &sources {
        // Single-source BFS shortest-path counting (Brandes stage 1).
        let mut stack: Vec<ElementId> = Vec::new();
        let mut predecessors: HashMap<ElementId, Vec<ElementId>> = HashMap::new();
        let mut sigma: HashMap<ElementId, f64> = nodes.iter().cloned().map(|id| (id, 0.0)).collect();
        let mut distance: HashMap<ElementId, i64> = nodes.iter().cloned().map(|id| (id, -1)).collect();
        sigma.insert(source.clone(), 1.0);
        distance.insert(source.clone(), 0);

        let mut queue = VecDeque::new();
        queue.push_back(source.clone());
        while let Some(v) = queue.pop_front() {
            stack.push(v.clone());
            for w in ctx.outgoing_neighbors(&v).chain(ctx.incoming_neighbors(&v)) {
                if !node_set.contains(w) {
                    continue;
                }
                if distance[w] < 0 {
                    distance.insert(w.clone(), distance[&v] + 1);
                    queue.push_back(w.clone());
                }
                if distance[w] == distance[&v] + 1 {
                    let sv = sigma[&v];
                    *sigma.get_mut(w).unwrap() += sv;
                    predecessors.entry(w.clone()).or_default().push(v.clone());
                }
            }
        }

        // Back-propagation of dependency (Brandes stage 2).
        let mut delta: HashMap<ElementId, f64> = nodes.iter().cloned().map(|id| (id, 0.0)).collect();
        while let Some(w) = stack.pop() {
            if let Some(preds) = predecessors.get(&w) {
                for v in preds {
                    let contribution = (sigma[v] / sigma[&w]) * (1.0 + delta[&w]);
                    *delta.get_mut(v).unwrap() += contribution;
                }
            }
            if w != *source {
                *scores.get_mut(&w).unwrap() += delta[&w];
            }
        }
    }

    let avg = scores.values().sum::<f64>() / scores.len().max(1) as f64;
    let threshold = avg * (nodes.len() as f64).log10().floor().max(1.0);

    Ok(BetweennessResult { scores, threshold })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Element, Predicate};

    fn chain(n: usize) -> (Context, Vec<ElementId>) {
        let mut ctx = Context::new();
        let ids: Vec<ElementId> = (0..n)
            .map(|i| ctx.upsert_element(Element::new(ElementKind::Entity, format!("e{i}"), ElementId::from("c1"))))
            .collect();
        for pair in ids.windows(2) {
            ctx.add_edge(Edge::connects_to(pair[0].clone(), pair[1].clone(), "co_occurrence", 1.0));
        }
        (ctx, ids)
    }

    #[test]
    fn empty_graph_errors() {
        let ctx = Context::new();
        assert!(matches!(betweenness_centrality(&ctx, 5, 1), Err(AlgoError::EmptyGraph)));
    }

    #[test]
    fn middle_of_a_chain_scores_highest() {
        let (ctx, ids) = chain(5);
        let result = betweenness_centrality(&ctx, 5, 1).unwrap();
        let middle = result.scores[&ids[2]];
        let edge = result.scores[&ids[0]];
        assert!(middle > edge);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let (ctx, _) = chain(20);
        let a = betweenness_centrality(&ctx, 3, 99).unwrap();
        let b = betweenness_centrality(&ctx, 3, 99).unwrap();
        assert_eq!(a.scores.len(), b.scores.len());
        for (id, score) in &a.scores {
            assert!((score - b.scores[id]).abs() < 1e-9);
        }
    }
}
