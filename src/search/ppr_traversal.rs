//! PPR-seeded traversal: runs a shallow personalized PageRank from a set of
//! entry points and buckets the top-5 highest-scoring elements per kind,
//! excluding the entry points themselves.
//!
//! Grounded on the graph-retrieval example's per-kind bucketing and
//! hop-decay expansion: that example decays score by hop distance from a
//! BFS; this crate gets the equivalent decay for free from PPR's restart
//! bias, so it buckets PPR's output the same way instead of re-deriving
//! hop decay.

use std::collections::HashMap;

use crate::algo::{personalized_pagerank, PprConfig};
use crate::error::{AlgoError, ErrorKind};
use crate::graph::{ElementId, ElementKind};

const TOP_PER_KIND: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct PprTraversalResult {
    pub by_kind: HashMap<ElementKind, Vec<ElementId>>,
}

/// Runs shallow PPR seeded at `entry_points` over the engine's in-memory
/// context for `corpus_id`, then keeps the top 5 scoring elements of each
/// kind, dropping the entry points themselves from the result.
pub fn ppr_traverse(
    ctx: &crate::graph::Context,
    entry_points: &[ElementId],
) -> Result<PprTraversalResult, ErrorKind> {
    let scores = match personalized_pagerank(ctx, entry_points, PprConfig::shallow()) {
        Ok(scores) => scores,
        Err(AlgoError::EmptyGraph) => return Ok(PprTraversalResult::default()),
        Err(e) => return Err(ErrorKind::from(e)),
    };

    let entry_set: std::collections::HashSet<&ElementId> = entry_points.iter().collect();
    let mut by_kind: HashMap<ElementKind, Vec<(ElementId, f64)>> = HashMap::new();

    for (id, score) in scores {
        if entry_set.contains(&id) {
            continue;
        }
        if let Some(element) = ctx.element(&id) {
            by_kind.entry(element.kind).or_default().push((id, score));
        }
    }

    let mut result = PprTraversalResult::default();
    for (kind, mut scored) in by_kind {
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(TOP_PER_KIND);
        result.by_kind.insert(kind, scored.into_iter().map(|(id, _)| id).collect());
    }
    Ok(result)
}
