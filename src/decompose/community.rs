//! Community aggregation: group entities into communities (connected
//! components — see `algo::leiden` for why this isn't true Leiden), k-means
//! over each community's embeddings to find semantically tight
//! sub-clusters, then synthesize one `CommunityElement` plus an `Overview`
//! `Attribute` per community via the LLM.

use crate::adapter::{EmbeddingAdapter, LlmAdapter};
use crate::algo::detect_communities;
use crate::error::ErrorKind;
use crate::graph::{Edge, Element, ElementId, ElementKind, GraphEngine, Predicate, PropertyValue};

/// Lloyd's-algorithm k-means, k = floor(sqrt(|members|)), run over member
/// embeddings. No corpus crate implements k-means; this is a direct,
/// from-scratch implementation since the clustering itself is simple enough
/// not to need one.
fn k_means(points: &[(ElementId, Vec<f32>)], k: usize, iterations: usize) -> Vec<Vec<ElementId>> {
    if points.is_empty() || k == 0 {
        return Vec::new();
    }
    let k = k.min(points.len());
    let dims = points[0].1.len();

    let mut centroids: Vec<Vec<f32>> = (0..k)
        .map(|i| points[i * points.len() / k].1.clone())
        .collect();

    let mut assignment = vec![0usize; points.len()];
    for _ in 0..iterations {
        for (idx, (_, vector)) in points.iter().enumerate() {
            let mut best = 0;
            let mut best_dist = f32::MAX;
            for (c_idx, centroid) in centroids.iter().enumerate() {
                let dist: f32 = vector.iter().zip(centroid).map(|(a, b)| (a - b).powi(2)).sum();
                if dist < best_dist {
                    best_dist = dist;
                    best = c_idx;
                }
            }
            assignment[idx] = best;
        }

        let mut sums = vec![vec![0.0f32; dims]; k];
        let mut counts = vec![0usize; k];
        for (idx, (_, vector)) in points.iter().enumerate() {
            let cluster = assignment[idx];
            counts[cluster] += 1;
            for (d, value) in vector.iter().enumerate() {
                sums[cluster][d] += value;
            }
        }
        for c_idx in 0..k {
            if counts[c_idx] > 0 {
                for d in 0..dims {
                    centroids[c_idx][d] = sums[c_idx][d] / counts[c_idx] as f32;
                }
            }
        }
    }

    let mut clusters: Vec<Vec<ElementId>> = vec![Vec::new(); k];
    for (idx, (id, _)) in points.iter().enumerate() {
        clusters[assignment[idx]].push(id.clone());
    }
    clusters.retain(|c| !c.is_empty());
    clusters
}

/// Runs community detection over the corpus, synthesizing one
/// `CommunityElement` and one `Overview` `Attribute` per detected
/// community. Returns the community element ids created.
pub async fn aggregate_communities(
    engine: &GraphEngine,
    corpus_id: &ElementId,
    llm: &dyn LlmAdapter,
    embedder: &dyn EmbeddingAdapter,
) -> Result<Vec<ElementId>, ErrorKind> {
    let communities = {
        let Some(ctx) = engine.context(corpus_id) else {
            return Ok(Vec::new());
        };
        match detect_communities(&ctx) {
            Ok(result) => result.communities,
            Err(_) => return Ok(Vec::new()),
        }
    };

    let mut created = Vec::new();
    for members in communities {
        if members.len() < 2 {
            continue;
        }

        let member_elements: Vec<Element> = {
            let Some(ctx) = engine.context(corpus_id) else { continue };
            members.iter().filter_map(|id| ctx.element(id).cloned()).collect()
        };

        let mut points = Vec::new();
        for member in &member_elements {
            let embedding = match &member.embedding {
                Some(v) => v.clone(),
                None => embedder.embed(&member.label).await.unwrap_or_default(),
            };
            if !embedding.is_empty() {
                points.push((member.id.clone(), embedding));
            }
        }
        let k = (points.len() as f64).sqrt().floor() as usize;
        let sub_clusters = k_means(&points, k.max(1), 10);

        let labels: Vec<&str> = member_elements.iter().map(|e| e.label.as_str()).collect();
        let community_label = format!("Community of {}", labels.join(", "));
        let community_id = engine
            .upsert_element(
                corpus_id,
                Element::new(ElementKind::CommunityElement, community_label, corpus_id.clone())
                    .with_property("sub_cluster_count", PropertyValue::Int(sub_clusters.len() as i64)),
            )
            .await?;

        for member_id in &members {
            engine
                .add_edge(corpus_id, Edge::new(community_id.clone(), member_id.clone(), Predicate::InCommunity))
                .await?;
        }

        let overview_text = llm
            .complete(&format!("Write a one-paragraph overview of: {}", labels.join(", ")))
            .await
            .unwrap_or_else(|_| format!("This community covers: {}", labels.join(", ")));

        let overview_id = engine
            .upsert_element(
                corpus_id,
                Element::new(ElementKind::Attribute, "Overview", corpus_id.clone())
                    .with_content(overview_text)
                    .with_property("sub_type", PropertyValue::String("overview".to_string())),
            )
            .await?;
        engine
            .add_edge(corpus_id, Edge::new(community_id.clone(), overview_id, Predicate::HasAttribute))
            .await?;

        created.push(community_id);
    }
    Ok(created)
}
