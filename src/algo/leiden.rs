//! Community detection.
//!
//! No crate in the example pack implements Leiden (or Louvain), and hand
//! rolling one from scratch risks a plausible-looking but wrong modularity
//! optimizer. This module always reports `leiden_available: false` and
//! falls back to connected components, which is honest about what it
//! actually computed rather than silently approximating Leiden.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::AlgoError;
use crate::graph::{Context, ElementId, ElementKind};

#[derive(Debug, Clone)]
pub struct CommunityResult {
    pub leiden_available: bool,
    pub communities: Vec<HashSet<ElementId>>,
    pub membership: HashMap<ElementId, usize>,
}

pub fn detect_communities(ctx: &Context) -> Result<CommunityResult, AlgoError> {
    let entities: Vec<ElementId> = ctx.elements_of_kind(ElementKind::Entity).map(|e| e.id.clone()).collect();
    if entities.is_empty() {
        return Err(AlgoError::EmptyGraph);
    }
    let entity_set: HashSet<ElementId> = entities.iter().cloned().collect();

    let mut visited: HashSet<ElementId> = HashSet::new();
    let mut communities: Vec<HashSet<ElementId>> = Vec::new();
    let mut membership: HashMap<ElementId, usize> = HashMap::new();

    for start in &entities {
        if visited.contains(start) {
            continue;
        }
        let mut component: HashSet<ElementId> = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(start.clone());
        visited.insert(start.clone());
        while let Some(node) = queue.pop_front() {
            component.insert(node.clone());
            for neighbor in ctx.outgoing_neighbors(&node).chain(ctx.incoming_neighbors(&node)) {
                if entity_set.contains(neighbor) && visited.insert(neighbor.clone()) {
                    queue.push_back(neighbor.clone());
                }
            }
        }
        let index = communities.len();
        for member in &component {
            membership.insert(member.clone(), index);
        }
        communities.push(component);
    }

    Ok(CommunityResult {
        leiden_available: false,
        communities,
        membership,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Element, Predicate};

    #[test]
    fn disconnected_entities_form_separate_communities() {
        let mut ctx = Context::new();
        ctx.upsert_element(Element::new(ElementKind::Entity, "a", ElementId::from("c1")));
        ctx.upsert_element(Element::new(ElementKind::Entity, "b", ElementId::from("c1")));
        let result = detect_communities(&ctx).unwrap();
        assert_eq!(result.communities.len(), 2);
        assert!(!result.leiden_available);
    }

    #[test]
    fn connected_entities_share_a_community() {
        let mut ctx = Context::new();
        let a = ctx.upsert_element(Element::new(ElementKind::Entity, "a", ElementId::from("c1")));
        let b = ctx.upsert_element(Element::new(ElementKind::Entity, "b", ElementId::from("c1")));
        ctx.add_edge(Edge::new(a.clone(), b.clone(), Predicate::HasSourceEntity));
        let result = detect_communities(&ctx).unwrap();
        assert_eq!(result.communities.len(), 1);
        assert_eq!(result.membership[&a], result.membership[&b]);
    }
}
