//! Candidate selection: Zoom/Pan restrict the candidate pool, then four
//! parallel strategies — embedding similarity, keyword match, graph
//! connectivity via PPR, temporal recency — score what's left and combine
//! via the zoom-specific weight vector (§4.9's table).
//!
//! Grounded on the teacher's `AnalyzerRegistry`: a fixed, priority-ordered
//! set of independent scorers run over the same input and combined, rather
//! than one monolithic ranking function.

use std::collections::{HashMap, HashSet};

use crate::algo::{personalized_pagerank, PprConfig};
use crate::graph::{Context, Element, ElementId};

use super::tilt::TiltContext;
use super::types::{Pan, Zoom};

/// (embed, keyword, graph, temporal) weight vector per zoom, §4.9.
fn weight_vector(zoom: Zoom) -> (f64, f64, f64, f64) {
    match zoom {
        Zoom::Micro => (0.8, 0.6, 0.4, 0.2),
        Zoom::Entity => (0.6, 0.7, 0.7, 0.4),
        Zoom::Text => (0.7, 0.8, 0.5, 0.3),
        Zoom::Unit => (0.7, 0.7, 0.5, 0.4),
        Zoom::Community => (0.4, 0.5, 0.6, 0.8),
        Zoom::Corpus => (0.3, 0.4, 0.5, 0.9),
    }
}

fn passes_pan_filters(ctx: &Context, element: &Element, pan: &Pan, entity_ids: &HashSet<ElementId>) -> bool {
    if !pan.domains.is_empty() {
        let domain = element.properties.get("domain").and_then(|v| v.as_str());
        if !domain.is_some_and(|d| pan.domains.iter().any(|p| p.eq_ignore_ascii_case(d))) {
            return false;
        }
    }
    if !entity_ids.is_empty() {
        let connected = entity_ids.contains(&element.id)
            || ctx.outgoing_neighbors(&element.id).any(|n| entity_ids.contains(n))
            || ctx.incoming_neighbors(&element.id).any(|n| entity_ids.contains(n));
        if !connected {
            return false;
        }
    }
    if let Some((start, end)) = pan.temporal {
        if element.metadata.created_at < start || element.metadata.created_at > end {
            return false;
        }
    }
    true
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

/// Cosine similarity remapped from `[-1, 1]` to `[0, 1]`; 0 for every
/// element when no query vector is available.
fn embedding_scores(ctx: &Context, pool: &[ElementId], query_vector: Option<&[f32]>) -> HashMap<ElementId, f64> {
    pool.iter()
        .map(|id| {
            let score = query_vector.zip(ctx.element(id).and_then(|e| e.embedding.as_ref())).map_or(
                0.0,
                |(query, embedding)| {
                    if embedding.len() == query.len() {
                        (cosine_similarity(embedding, query) + 1.0) / 2.0
                    } else {
                        0.0
                    }
                },
            );
            (id.clone(), score)
        })
        .collect()
}

/// Keyword hit fraction, already bounded to `[0, 1]`.
fn keyword_scores(ctx: &Context, pool: &[ElementId], keywords: &[String]) -> HashMap<ElementId, f64> {
    if keywords.is_empty() {
        return pool.iter().cloned().map(|id| (id, 0.0)).collect();
    }
    let needles: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    pool.iter()
        .map(|id| {
            let score = ctx
                .element(id)
                .map(|e| {
                    let haystack = format!("{} {}", e.label, e.content.as_deref().unwrap_or("")).to_lowercase();
                    let hits = needles.iter().filter(|n| haystack.contains(n.as_str())).count();
                    hits as f64 / needles.len() as f64
                })
                .unwrap_or(0.0);
            (id.clone(), score)
        })
        .collect()
}

/// PPR seeded at `graph_seeds`, normalized to `[0, 1]` by dividing by the
/// pool's max score. Degrades to all-zero (not to raw degree) when there are
/// no live seeds or the PPR pass itself errors.
fn graph_scores(ctx: &Context, pool: &[ElementId], graph_seeds: &[ElementId]) -> HashMap<ElementId, f64> {
    let zeros = || pool.iter().cloned().map(|id| (id, 0.0)).collect();
    if graph_seeds.is_empty() {
        return zeros();
    }
    let raw = match personalized_pagerank(ctx, graph_seeds, PprConfig::shallow()) {
        Ok(scores) => scores,
        Err(_) => return zeros(),
    };
    let pool_scores: HashMap<ElementId, f64> =
        pool.iter().map(|id| (id.clone(), raw.get(id).copied().unwrap_or(0.0))).collect();
    let max = pool_scores.values().cloned().fold(0.0, f64::max);
    if max <= 0.0 {
        return zeros();
    }
    pool_scores.into_iter().map(|(id, score)| (id, score / max)).collect()
}

/// Rank-based recency: the newest element in `pool` scores 1.0, the oldest
/// scores 0.0, evenly spaced in between.
fn temporal_scores(ctx: &Context, pool: &[ElementId]) -> HashMap<ElementId, f64> {
    let mut by_age: Vec<&ElementId> = pool.iter().collect();
    by_age.sort_by_key(|id| ctx.element(id).map(|e| e.metadata.created_at));
    let n = by_age.len();
    by_age
        .into_iter()
        .enumerate()
        .map(|(rank, id)| (id.clone(), if n <= 1 { 1.0 } else { rank as f64 / (n - 1) as f64 }))
        .collect()
}

/// Restricts candidates to Zoom's kind set and Pan's filters, scores the
/// survivors with the four §4.9 strategies, combines them with the zoom's
/// weight vector, and returns the result ordered by combined score
/// descending, breaking ties by graph degree then element id.
pub fn select_candidates(ctx: &Context, zoom: Zoom, pan: &Pan, tilt_ctx: &TiltContext) -> Vec<(Element, f64)> {
    let entity_ids: HashSet<ElementId> = pan
        .entities
        .iter()
        .filter_map(|name| ctx.find_entity_by_label(name).map(|e| e.id.clone()))
        .collect();

    let pool: Vec<ElementId> = ctx
        .all_elements()
        .filter(|e| zoom.kinds().contains(&e.kind))
        // Community zoom's Attribute slot is Overview attributes only
        // (§4.8's {CommunityElement, Attribute (Overview)}); every other
        // zoom's kind set is unambiguous.
        .filter(|e| zoom != Zoom::Community || e.kind != crate::graph::ElementKind::Attribute || e.is_overview())
        .filter(|e| passes_pan_filters(ctx, e, pan, &entity_ids))
        .map(|e| e.id.clone())
        .collect();

    let embed = embedding_scores(ctx, &pool, tilt_ctx.query_vector);
    let keyword = keyword_scores(ctx, &pool, &pan.keywords);
    let graph = graph_scores(ctx, &pool, &tilt_ctx.graph_seeds);
    let temporal = temporal_scores(ctx, &pool);
    let (w_embed, w_keyword, w_graph, w_temporal) = weight_vector(zoom);

    let mut candidates: Vec<(Element, f64)> = pool
        .into_iter()
        .filter_map(|id| ctx.element(&id).cloned().map(|e| (id, e)))
        .map(|(id, element)| {
            let score = w_embed * embed.get(&id).copied().unwrap_or(0.0)
                + w_keyword * keyword.get(&id).copied().unwrap_or(0.0)
                + w_graph * graph.get(&id).copied().unwrap_or(0.0)
                + w_temporal * temporal.get(&id).copied().unwrap_or(0.0);
            (element, score)
        })
        .collect();

    candidates.sort_by(|(ea, sa), (eb, sb)| {
        sb.partial_cmp(sa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| ctx.degree(&eb.id).cmp(&ctx.degree(&ea.id)))
            .then_with(|| ea.id.cmp(&eb.id))
    });

    candidates.truncate(zoom.result_cap());
    candidates
}
