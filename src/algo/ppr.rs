//! Row-normalized personalized PageRank.
//!
//! No corpus crate implements PPR; this is a direct iterative power-method
//! implementation over a row-normalized transition matrix, restarting to a
//! fixed seed-element distribution each step, stopping early on L1
//! convergence.

use std::collections::HashMap;

use crate::error::AlgoError;
use crate::graph::{Context, ElementId};

#[derive(Debug, Clone, Copy)]
pub struct PprConfig {
    pub alpha: f64,
    pub max_iterations: usize,
    pub convergence_epsilon: f64,
}

impl PprConfig {
    /// Shallow pass used by live traversal: few iterations, heavy restart bias.
    pub fn shallow() -> Self {
        Self {
            alpha: 0.5,
            max_iterations: 2,
            convergence_epsilon: 1e-6,
        }
    }

    /// Deep pass used during community enrichment: more iterations, lighter restart.
    pub fn deep() -> Self {
        Self {
            alpha: 0.15,
            max_iterations: 10,
            convergence_epsilon: 1e-6,
        }
    }
}

fn adjacency(ctx: &Context) -> HashMap<ElementId, Vec<ElementId>> {
    let mut adj: HashMap<ElementId, Vec<ElementId>> = HashMap::new();
    for element in ctx.all_elements() {
        let neighbors: Vec<ElementId> = ctx
            .outgoing_neighbors(&element.id)
            .chain(ctx.incoming_neighbors(&element.id))
            .cloned()
            .collect();
        adj.insert(element.id.clone(), neighbors);
    }
    adj
}

/// Computes personalized PageRank seeded uniformly over `seeds`, returning a
/// score per reachable node. `seeds` not present in the graph are ignored.
pub fn personalized_pagerank(
    ctx: &Context,
    seeds: &[ElementId],
    config: PprConfig,
) -> Result<HashMap<ElementId, f64>, AlgoError> {
    let adj = adjacency(ctx);
    if adj.is_empty() {
        return Err(AlgoError::EmptyGraph);
    }
    let live_seeds: Vec<&ElementId> = seeds.iter().filter(|s| adj.contains_key(*s)).collect();
    if live_seeds.is_empty() {
        return Err(AlgoError::Precondition("no seed is present in the graph".to_string()));
    }

    let restart_mass = 1.0 / live_seeds.len() as f64;
    let mut restart: HashMap<ElementId, f64> = adj.keys().cloned().map(|id| (id, 0.0)).collect();
    for seed in &live_seeds {
        restart.insert((*seed).clone(), restart_mass);
    }

    let mut scores = restart.clone();
    for _ in 0..config.max_iterations {
        let mut next: HashMap<ElementId, f64> = adj.keys().cloned().map(|id| (id, 0.0)).collect();
        for (node, neighbors) in &adj {
            let mass = scores[node];
            if neighbors.is_empty() || mass == 0.0 {
                continue;
            }
            let share = mass * (1.0 - config.alpha) / neighbors.len() as f64;
            for neighbor in neighbors {
                *next.get_mut(neighbor).unwrap() += share;
            }
        }
        for (node, value) in next.iter_mut() {
            *value += config.alpha * restart[node];
        }

        let l1_delta: f64 = adj
            .keys()
            .map(|id| (next[id] - scores[id]).abs())
            .sum();
        scores = next;
        if l1_delta < config.convergence_epsilon {
            break;
        }
    }

    Ok(scores)
}
