//! A layered, seeded HNSW index.
//!
//! Generalizes the corpus's single-layer DashMap+BinaryHeap ANN structure
//! into a true multi-layer HNSW: each node is assigned a maximum layer by
//! the standard exponential draw, biased by a per-index seeded RNG so that
//! two runs with the same `seed` produce the same graph and therefore the
//! same `base_layer_edges()` — required for deterministic enrichment.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::VectorError;
use crate::graph::ElementId;

use super::traits::{ScoredElement, VectorIndex};

#[derive(Debug, Clone)]
pub struct HnswConfig {
    /// Max bidirectional links per node per layer.
    pub m: usize,
    /// Candidate list size during insertion.
    pub ef_construction: usize,
    /// Candidate list size during search.
    pub ef_search: usize,
    pub seed: u64,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            m: 16,
            ef_construction: 200,
            ef_search: 50,
            seed: 42,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
struct Candidate {
    id_hash: u64,
    dist: f32,
}

impl Eq for Candidate {}
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist.partial_cmp(&other.dist).unwrap_or(Ordering::Equal)
    }
}
impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct CorpusIndex {
    vectors: HashMap<ElementId, Vec<f32>>,
    /// `layers[l]` maps a node present at layer `l` to its neighbors at `l`.
    layers: Vec<HashMap<ElementId, Vec<ElementId>>>,
    node_max_layer: HashMap<ElementId, usize>,
    entry_point: Option<ElementId>,
    rng: StdRng,
    config: HnswConfig,
}

impl CorpusIndex {
    fn new(config: HnswConfig) -> Self {
        Self {
            vectors: HashMap::new(),
            layers: vec![HashMap::new()],
            node_max_layer: HashMap::new(),
            entry_point: None,
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    fn assign_layer(&mut self) -> usize {
        let m_l = 1.0 / (self.config.m as f64).ln();
        let uniform: f64 = self.rng.gen_range(f64::EPSILON..1.0);
        (-uniform.ln() * m_l).floor() as usize
    }

    fn distance(a: &[f32], b: &[f32]) -> f32 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f32>()
            .sqrt()
    }

    fn insert(&mut self, id: ElementId, vector: Vec<f32>) {
        let target_layer = self.assign_layer();
        while self.layers.len() <= target_layer {
            self.layers.push(HashMap::new());
        }

        self.vectors.insert(id.clone(), vector.clone());
        self.node_max_layer.insert(id.clone(), target_layer);

        let Some(entry) = self.entry_point.clone() else {
            for layer in self.layers.iter_mut().take(target_layer + 1) {
                layer.insert(id.clone(), Vec::new());
            }
            self.entry_point = Some(id);
            return;
        };

        let entry_layer = self.node_max_layer.get(&entry).copied().unwrap_or(0);
        for layer_idx in (0..=target_layer.min(entry_layer)).rev() {
            let candidates = self.search_layer(&vector, &entry, layer_idx, self.config.ef_construction);
            let neighbors: Vec<ElementId> = candidates
                .into_iter()
                .take(self.config.m)
                .map(|c| c.0)
                .collect();
            self.layers[layer_idx].insert(id.clone(), neighbors.clone());
            for n in &neighbors {
                let back = self.layers[layer_idx].entry(n.clone()).or_default();
                if !back.contains(&id) {
                    back.push(id.clone());
                    if back.len() > self.config.m {
                        back.sort_by(|a, b| {
                            let da = Self::distance(&vector, self.vectors.get(a).unwrap());
                            let db = Self::distance(&vector, self.vectors.get(b).unwrap());
                            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
                        });
                        back.truncate(self.config.m);
                    }
                }
            }
        }
        for layer_idx in (entry_layer + 1)..=target_layer {
            self.layers[layer_idx].entry(id.clone()).or_default();
        }

        if target_layer > entry_layer {
            self.entry_point = Some(id);
        }
    }

    /// Greedy beam search within a single layer, seeded from `entry`.
    fn search_layer(&self, query: &[f32], entry: &ElementId, layer: usize, ef: usize) -> Vec<(ElementId, f32)> {
        let mut visited: HashSet<ElementId> = HashSet::new();
        visited.insert(entry.clone());

        let entry_dist = self
            .vectors
            .get(entry)
            .map(|v| Self::distance(query, v))
            .unwrap_or(f32::MAX);

        let mut candidates: BinaryHeap<std::cmp::Reverse<OrdById>> = BinaryHeap::new();
        candidates.push(std::cmp::Reverse(OrdById(entry_dist, entry.clone())));
        let mut best: Vec<(ElementId, f32)> = vec![(entry.clone(), entry_dist)];

        while let Some(std::cmp::Reverse(OrdById(dist, current))) = candidates.pop() {
            if best.len() >= ef {
                let worst = best.iter().map(|(_, d)| *d).fold(f32::MIN, f32::max);
                if dist > worst {
                    break;
                }
            }
            if let Some(neighbors) = self.layers.get(layer).and_then(|l| l.get(&current)) {
                for n in neighbors {
                    if visited.insert(n.clone()) {
                        if let Some(v) = self.vectors.get(n) {
                            let d = Self::distance(query, v);
                            candidates.push(std::cmp::Reverse(OrdById(d, n.clone())));
                            best.push((n.clone(), d));
                        }
                    }
                }
            }
        }

        best.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        best.truncate(ef.max(1));
        best
    }

    fn search(&self, query: &[f32], k: usize) -> Vec<ScoredElement> {
        let Some(entry) = &self.entry_point else {
            return Vec::new();
        };
        let top_layer = self.layers.len() - 1;
        let mut current_entry = entry.clone();
        for layer_idx in (1..=top_layer).rev() {
            let found = self.search_layer(query, &current_entry, layer_idx, 1);
            if let Some((best, _)) = found.into_iter().next() {
                current_entry = best;
            }
        }
        let found = self.search_layer(query, &current_entry, 0, self.config.ef_search.max(k));
        found
            .into_iter()
            .filter(|(id, _)| self.vectors.contains_key(id))
            .take(k)
            .map(|(id, dist)| ScoredElement {
                id,
                score: 1.0 / (1.0 + dist),
            })
            .collect()
    }

    fn base_layer_edges(&self) -> Vec<(ElementId, ElementId, f32)> {
        let mut seen: HashSet<(ElementId, ElementId)> = HashSet::new();
        let mut edges = Vec::new();
        if let Some(layer0) = self.layers.first() {
            for (src, neighbors) in layer0 {
                for dst in neighbors {
                    let key = if src.as_str() < dst.as_str() {
                        (src.clone(), dst.clone())
                    } else {
                        (dst.clone(), src.clone())
                    };
                    if seen.insert(key) {
                        let dist = Self::distance(
                            self.vectors.get(src).unwrap(),
                            self.vectors.get(dst).unwrap(),
                        );
                        edges.push((src.clone(), dst.clone(), 1.0 / (1.0 + dist)));
                    }
                }
            }
        }
        edges
    }
}

#[derive(Clone)]
struct OrdById(f32, ElementId);
impl PartialEq for OrdById {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for OrdById {}
impl PartialOrd for OrdById {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for OrdById {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

pub struct HnswIndex {
    corpora: DashMap<ElementId, Mutex<CorpusIndex>>,
    config: HnswConfig,
}

impl HnswIndex {
    pub fn new(config: HnswConfig) -> Self {
        Self {
            corpora: DashMap::new(),
            config,
        }
    }
}

impl Default for HnswIndex {
    fn default() -> Self {
        Self::new(HnswConfig::default())
    }
}

#[async_trait]
impl VectorIndex for HnswIndex {
    async fn insert(&self, corpus_id: &ElementId, element_id: ElementId, vector: Vec<f32>) -> Result<(), VectorError> {
        let entry = self
            .corpora
            .entry(corpus_id.clone())
            .or_insert_with(|| Mutex::new(CorpusIndex::new(self.config.clone())));
        entry
            .lock()
            .expect("hnsw corpus mutex poisoned")
            .insert(element_id, vector);
        Ok(())
    }

    async fn remove(&self, corpus_id: &ElementId, element_id: &ElementId) -> Result<(), VectorError> {
        if let Some(entry) = self.corpora.get(corpus_id) {
            let mut index = entry.lock().expect("hnsw corpus mutex poisoned");
            index.vectors.remove(element_id);
            index.node_max_layer.remove(element_id);
            for layer in index.layers.iter_mut() {
                layer.remove(element_id);
                for neighbors in layer.values_mut() {
                    neighbors.retain(|n| n != element_id);
                }
            }
        }
        Ok(())
    }

    async fn search(&self, corpus_id: &ElementId, query: &[f32], k: usize) -> Result<Vec<ScoredElement>, VectorError> {
        let Some(entry) = self.corpora.get(corpus_id) else {
            return Ok(Vec::new());
        };
        Ok(entry.lock().expect("hnsw corpus mutex poisoned").search(query, k))
    }

    async fn base_layer_edges(&self, corpus_id: &ElementId) -> Result<Vec<(ElementId, ElementId, f32)>, VectorError> {
        let Some(entry) = self.corpora.get(corpus_id) else {
            return Ok(Vec::new());
        };
        Ok(entry.lock().expect("hnsw corpus mutex poisoned").base_layer_edges())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> ElementId {
        ElementId::from("c1")
    }

    #[tokio::test]
    async fn search_returns_nearest_first() {
        let index = HnswIndex::default();
        let corpus = corpus();
        index.insert(&corpus, ElementId::from("a"), vec![0.0, 0.0]).await.unwrap();
        index.insert(&corpus, ElementId::from("b"), vec![1.0, 0.0]).await.unwrap();
        index.insert(&corpus, ElementId::from("c"), vec![10.0, 10.0]).await.unwrap();

        let results = index.search(&corpus, &[0.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, ElementId::from("a"));
    }

    #[tokio::test]
    async fn same_seed_produces_same_base_layer_edges() {
        let corpus = corpus();
        let build = || async {
            let index = HnswIndex::new(HnswConfig { seed: 7, ..HnswConfig::default() });
            for i in 0..20 {
                index
                    .insert(&corpus, ElementId::from(format!("n{i}")), vec![i as f32, (i * 2) as f32])
                    .await
                    .unwrap();
            }
            let mut edges = index.base_layer_edges(&corpus).await.unwrap();
            edges.sort_by(|a, b| (a.0.as_str(), a.1.as_str()).cmp(&(b.0.as_str(), b.1.as_str())));
            edges
        };
        assert_eq!(build().await, build().await);
    }

    #[tokio::test]
    async fn remove_drops_element_from_search() {
        let index = HnswIndex::default();
        let corpus = corpus();
        index.insert(&corpus, ElementId::from("a"), vec![0.0, 0.0]).await.unwrap();
        index.remove(&corpus, &ElementId::from("a")).await.unwrap();
        let results = index.search(&corpus, &[0.0, 0.0], 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn unknown_corpus_search_is_empty_not_error() {
        let index = HnswIndex::default();
        let results = index.search(&ElementId::from("missing"), &[0.0], 5).await.unwrap();
        assert!(results.is_empty());
    }
}
