//! `Edge`: typed relationships between elements.
//!
//! Follows the teacher's `graph/edge.rs` shape (source/target ids plus a
//! typed relationship and a raw weight) but closes the relationship type
//! down to the fixed `Predicate` vocabulary this crate actually needs,
//! instead of the teacher's free-form `relationship: String`.

use super::id::ElementId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::element::{Properties, PropertyValue};

/// The fixed predicate vocabulary. `ConnectsTo` is the one weighted,
/// accumulating predicate (HNSW base-layer + co-occurrence edges); every
/// other predicate is structural and unweighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Predicate {
    HasUnit,
    HasAttribute,
    HasTextElement,
    HasCommunityElement,
    InCommunity,
    HasSourceEntity,
    HasTargetEntity,
    /// Weighted similarity/co-occurrence edge between two retrievable
    /// elements; `sub_type` distinguishes e.g. `"embedding"` from
    /// `"co_occurrence"` origins so `augment`/`search` can filter by kind.
    ConnectsTo { sub_type: String, weight: f64 },
}

impl Predicate {
    pub fn weight(&self) -> f64 {
        match self {
            Predicate::ConnectsTo { weight, .. } => *weight,
            _ => 1.0,
        }
    }

    pub fn is_connects_to(&self) -> bool {
        matches!(self, Predicate::ConnectsTo { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: ElementId,
    pub source: ElementId,
    pub target: ElementId,
    pub predicate: Predicate,
    pub created_at: DateTime<Utc>,
    pub properties: Properties,
}

impl Edge {
    pub fn new(source: ElementId, target: ElementId, predicate: Predicate) -> Self {
        Self {
            id: ElementId::new(),
            source,
            target,
            predicate,
            created_at: Utc::now(),
            properties: HashMap::new(),
        }
    }

    pub fn connects_to(source: ElementId, target: ElementId, sub_type: impl Into<String>, weight: f64) -> Self {
        Self::new(
            source,
            target,
            Predicate::ConnectsTo {
                sub_type: sub_type.into(),
                weight,
            },
        )
    }

    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Accumulate additional weight onto an existing `ConnectsTo` edge,
    /// following the teacher's `Context::add_edge` merge-not-duplicate rule.
    pub fn accumulate_weight(&mut self, delta: f64) {
        if let Predicate::ConnectsTo { weight, .. } = &mut self.predicate {
            *weight += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_predicates_have_unit_weight() {
        let e = Edge::new(ElementId::new(), ElementId::new(), Predicate::HasUnit);
        assert_eq!(e.predicate.weight(), 1.0);
        assert!(!e.predicate.is_connects_to());
    }

    #[test]
    fn connects_to_accumulates() {
        let mut e = Edge::connects_to(ElementId::new(), ElementId::new(), "embedding", 0.8);
        assert!(e.predicate.is_connects_to());
        e.accumulate_weight(0.2);
        assert_eq!(e.predicate.weight(), 1.0);
    }
}
