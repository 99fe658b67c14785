//! `Element`: the single struct backing all seven node kinds.
//!
//! A closed `ElementKind` enum tags each element; kind-specific data lives in
//! `properties`, the teacher's untagged-enum `PropertyValue` map. Unlike the
//! teacher's free-form `node_type: String`, the kind here is a Rust enum —
//! the algorithms and the retrieval filter switch on it exhaustively.

use super::id::ElementId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The seven node kinds plus the two collection kinds (Corpus/Corpuscle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    TextElement,
    Unit,
    Entity,
    Relationship,
    Attribute,
    CommunityElement,
    Corpus,
    Corpuscle,
}

impl ElementKind {
    /// Kinds whose content may appear in a final retrieval result, per the
    /// retrievable column of the data model table. `Attribute` is retrievable
    /// unless its `sub_type` is `"overview"` — checked separately by callers
    /// since that's a property, not a kind distinction.
    pub fn is_retrievable_kind(&self) -> bool {
        matches!(
            self,
            ElementKind::TextElement
                | ElementKind::Unit
                | ElementKind::Relationship
                | ElementKind::Attribute
                | ElementKind::CommunityElement
        )
    }

    /// Kinds that may carry an embedding vector.
    pub fn is_embeddable_kind(&self) -> bool {
        matches!(
            self,
            ElementKind::TextElement
                | ElementKind::Unit
                | ElementKind::Attribute
                | ElementKind::CommunityElement
        )
    }
}

/// Typed property values. Untagged so JSON round-trips without a wrapper,
/// matching the teacher's `PropertyValue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Vec<PropertyValue>),
    Object(HashMap<String, PropertyValue>),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

pub type Properties = HashMap<String, PropertyValue>;

/// Creation/provenance metadata common to every element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementMetadata {
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    /// Opaque provenance reference (e.g. which decomposition run produced this).
    pub provenance: Option<String>,
}

impl Default for ElementMetadata {
    fn default() -> Self {
        Self {
            created_at: Utc::now(),
            modified_at: None,
            provenance: None,
        }
    }
}

/// One node in the heterogeneous knowledge graph.
///
/// Carries a stable identifier, preferred label, optional content text,
/// optional embedding vector, creation timestamp, and provenance reference —
/// the `Element` supertype of §3 — plus a `properties` bag for kind-specific
/// data (e.g. a Relationship's endpoints, an Attribute's `sub_type`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub label: String,
    pub content: Option<String>,
    pub embedding: Option<Vec<f32>>,
    pub corpus_id: ElementId,
    pub properties: Properties,
    pub metadata: ElementMetadata,
}

impl Element {
    pub fn new(kind: ElementKind, label: impl Into<String>, corpus_id: ElementId) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            label: label.into(),
            content: None,
            embedding: None,
            corpus_id,
            properties: HashMap::new(),
            metadata: ElementMetadata::default(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Case-folded label, used by entity resolution's find-or-create match.
    pub fn normal_form_label(&self) -> String {
        self.label.to_lowercase()
    }

    /// True for an `Attribute` whose `sub_type` property is `"overview"`.
    pub fn is_overview(&self) -> bool {
        self.kind == ElementKind::Attribute
            && self
                .properties
                .get("sub_type")
                .and_then(PropertyValue::as_str)
                == Some("overview")
    }

    /// Retrievable per §4.7: retrievable kind, non-Overview, non-empty content.
    pub fn is_retrievable(&self) -> bool {
        self.kind.is_retrievable_kind()
            && !self.is_overview()
            && self.content.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Eligible to seed traversal: Entity, or an Overview Attribute.
    pub fn is_entry_point_candidate(&self) -> bool {
        self.kind == ElementKind::Entity || self.is_overview()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> ElementId {
        ElementId::from("corpus:test")
    }

    #[test]
    fn overview_attribute_is_not_retrievable() {
        let e = Element::new(ElementKind::Attribute, "Hinton overview", corpus())
            .with_content("some overview text")
            .with_property("sub_type", PropertyValue::String("overview".into()));
        assert!(e.is_overview());
        assert!(!e.is_retrievable());
        assert!(e.is_entry_point_candidate());
    }

    #[test]
    fn plain_attribute_is_retrievable_with_content() {
        let e = Element::new(ElementKind::Attribute, "Hinton bio", corpus())
            .with_content("Hinton invented backpropagation.");
        assert!(!e.is_overview());
        assert!(e.is_retrievable());
        assert!(!e.is_entry_point_candidate());
    }

    #[test]
    fn entity_is_never_retrievable() {
        let e = Element::new(ElementKind::Entity, "Hinton", corpus()).with_content("text");
        assert!(!e.is_retrievable());
        assert!(e.is_entry_point_candidate());
    }

    #[test]
    fn empty_content_is_not_retrievable() {
        let e = Element::new(ElementKind::Unit, "u1", corpus());
        assert!(!e.is_retrievable());
    }

    #[test]
    fn normal_form_label_case_folds() {
        let e = Element::new(ElementKind::Entity, "Geoffrey Hinton", corpus());
        assert_eq!(e.normal_form_label(), "geoffrey hinton");
    }
}
