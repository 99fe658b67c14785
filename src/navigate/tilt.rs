//! Tilt: re-ranks a candidate set by one of four lenses, without changing
//! which elements are in scope — that's Zoom/Pan's job.

use crate::algo::{personalized_pagerank, PprConfig};
use crate::graph::{Context, Element, ElementId};

use super::types::Tilt;

fn rank_by_keywords(ctx: &Context, candidates: &mut [(Element, f64)], keywords: &[String]) {
    if keywords.is_empty() {
        return;
    }
    let needles: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    for (element, score) in candidates.iter_mut() {
        let haystack = format!("{} {}", element.label, element.content.as_deref().unwrap_or("")).to_lowercase();
        let hits = needles.iter().filter(|n| haystack.contains(n.as_str())).count() as f64;
        *score = hits;
    }
    let _ = ctx;
}

fn rank_by_embedding(_ctx: &Context, candidates: &mut [(Element, f64)], query_vector: Option<&[f32]>) {
    let Some(query) = query_vector else { return };
    for (element, score) in candidates.iter_mut() {
        *score = match &element.embedding {
            Some(v) if v.len() == query.len() => cosine_similarity(v, query),
            _ => 0.0,
        };
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)) as f64
    }
}

/// Ranks by PPR score seeded at `graph_seeds` (§4.6's shallow pass, reused
/// per §4.8's "graph: rank by PPR score"). Degrades to zero for every
/// candidate — not to raw degree — when there's no seed to restart from or
/// the pass itself can't run (empty graph, no live seed).
fn rank_by_graph(ctx: &Context, candidates: &mut [(Element, f64)], graph_seeds: &[ElementId]) {
    if graph_seeds.is_empty() {
        for (_, score) in candidates.iter_mut() {
            *score = 0.0;
        }
        return;
    }
    let scores = match personalized_pagerank(ctx, graph_seeds, PprConfig::shallow()) {
        Ok(scores) => scores,
        Err(_) => {
            for (_, score) in candidates.iter_mut() {
                *score = 0.0;
            }
            return;
        }
    };
    for (element, score) in candidates.iter_mut() {
        *score = scores.get(&element.id).copied().unwrap_or(0.0);
    }
}

fn rank_by_temporal(candidates: &mut [(Element, f64)]) {
    candidates.sort_by(|(a, _), (b, _)| b.metadata.created_at.cmp(&a.metadata.created_at));
    let n = candidates.len().max(1) as f64;
    for (idx, (_, score)) in candidates.iter_mut().enumerate() {
        *score = n - idx as f64;
    }
}

/// Context a Tilt projector (and the §4.9 selector) needs beyond the
/// candidate list itself.
#[derive(Default)]
pub struct TiltContext<'a> {
    pub keywords: Vec<String>,
    pub query_vector: Option<&'a [f32]>,
    /// Seed elements the `graph` tilt/strategy restarts PPR from.
    pub graph_seeds: Vec<ElementId>,
}

/// Re-scores `candidates` in place per `tilt`, then re-sorts by the new
/// score descending (stable, so equal scores keep their incoming order).
pub fn apply_tilt(ctx: &Context, tilt: Tilt, candidates: &mut Vec<(Element, f64)>, tilt_ctx: &TiltContext) {
    match tilt {
        Tilt::Keywords => rank_by_keywords(ctx, candidates, &tilt_ctx.keywords),
        Tilt::Embedding => rank_by_embedding(ctx, candidates, tilt_ctx.query_vector),
        Tilt::Graph => rank_by_graph(ctx, candidates, &tilt_ctx.graph_seeds),
        Tilt::Temporal => {
            rank_by_temporal(candidates);
            return;
        }
    }
    candidates.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
}
