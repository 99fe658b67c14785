//! `Context`: the in-memory index for one corpus's elements and edges.
//!
//! Mirrors the teacher's `Context` (per-context element/edge maps plus
//! secondary indices) but indexes by `ElementKind` and by case-folded label
//! instead of the teacher's `ContentType`/free-form properties, and merges
//! `ConnectsTo` edges by accumulating weight rather than the teacher's
//! generic weight-merge (same idea, narrower trigger).

use std::collections::{HashMap, HashSet};

use super::edge::{Edge, Predicate};
use super::element::{Element, ElementKind};
use super::id::ElementId;

/// All elements and edges belonging to one corpus, plus the indices that
/// make lookup and traversal cheap.
#[derive(Debug, Default, Clone)]
pub struct Context {
    elements: HashMap<ElementId, Element>,
    edges: HashMap<ElementId, Edge>,
    by_kind: HashMap<ElementKind, HashSet<ElementId>>,
    /// Normalized label -> element id, restricted to `Entity` elements; this
    /// is the index entity resolution's find-or-create match consults.
    entity_by_label: HashMap<String, ElementId>,
    outgoing: HashMap<ElementId, HashSet<ElementId>>,
    incoming: HashMap<ElementId, HashSet<ElementId>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn elements_of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &Element> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.elements.get(id))
    }

    pub fn all_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn all_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn edge(&self, id: &ElementId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn find_entity_by_label(&self, label: &str) -> Option<&Element> {
        self.entity_by_label
            .get(&label.to_lowercase())
            .and_then(|id| self.elements.get(id))
    }

    pub fn upsert_element(&mut self, element: Element) -> ElementId {
        let id = element.id.clone();
        self.by_kind.entry(element.kind).or_default().insert(id.clone());
        if element.kind == ElementKind::Entity {
            self.entity_by_label
                .insert(element.normal_form_label(), id.clone());
        }
        self.elements.insert(id.clone(), element);
        id
    }

    pub fn remove_element(&mut self, id: &ElementId) -> Option<Element> {
        let removed = self.elements.remove(id)?;
        if let Some(set) = self.by_kind.get_mut(&removed.kind) {
            set.remove(id);
        }
        if removed.kind == ElementKind::Entity {
            self.entity_by_label.remove(&removed.normal_form_label());
        }
        self.outgoing.remove(id);
        self.incoming.remove(id);
        Some(removed)
    }

    /// Inserts an edge, accumulating weight onto an existing `ConnectsTo`
    /// edge between the same pair with the same `sub_type` rather than
    /// creating a duplicate.
    pub fn add_edge(&mut self, edge: Edge) -> ElementId {
        if let Predicate::ConnectsTo { sub_type, weight } = &edge.predicate {
            let existing = self.edges.values_mut().find(|e| {
                e.source == edge.source
                    && e.target == edge.target
                    && matches!(&e.predicate, Predicate::ConnectsTo { sub_type: s, .. } if s == sub_type)
            });
            if let Some(existing) = existing {
                existing.accumulate_weight(*weight);
                return existing.id.clone();
            }
        }
        let id = edge.id.clone();
        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .insert(edge.target.clone());
        self.incoming
            .entry(edge.target.clone())
            .or_default()
            .insert(edge.source.clone());
        self.edges.insert(id.clone(), edge);
        id
    }

    pub fn outgoing_neighbors(&self, id: &ElementId) -> impl Iterator<Item = &ElementId> {
        self.outgoing.get(id).into_iter().flatten()
    }

    pub fn incoming_neighbors(&self, id: &ElementId) -> impl Iterator<Item = &ElementId> {
        self.incoming.get(id).into_iter().flatten()
    }

    pub fn edges_between(&self, source: &ElementId, target: &ElementId) -> Vec<&Edge> {
        self.edges
            .values()
            .filter(|e| e.source == *source && e.target == *target)
            .collect()
    }

    pub fn degree(&self, id: &ElementId) -> usize {
        self.outgoing.get(id).map_or(0, |s| s.len())
            + self.incoming.get(id).map_or(0, |s| s.len())
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
