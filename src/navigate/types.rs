//! Zoom/Pan/Tilt/Transform request types and validation.
//!
//! Grounded on the teacher's query builder pattern (`TraverseQuery`,
//! `FindQuery`): plain structs with validated construction rather than a
//! trait hierarchy, consuming-`with_*` builders for the optional fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::ElementKind;

/// What's in scope, and how many results each level caps out at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zoom {
    Micro,
    Entity,
    Text,
    Unit,
    Community,
    Corpus,
}

impl Zoom {
    pub fn kinds(&self) -> &'static [ElementKind] {
        match self {
            Zoom::Micro => &[ElementKind::TextElement],
            Zoom::Entity => &[ElementKind::Entity],
            Zoom::Text => &[ElementKind::TextElement, ElementKind::Unit],
            Zoom::Unit => &[ElementKind::Unit],
            // Overview attributes only, per the spec's {CommunityElement,
            // Attribute (Overview)} scope; `selector` filters the non-overview
            // attributes back out since `ElementKind` doesn't carry that
            // distinction on its own.
            Zoom::Community => &[ElementKind::CommunityElement, ElementKind::Attribute],
            Zoom::Corpus => &[ElementKind::CommunityElement],
        }
    }

    pub fn result_cap(&self) -> usize {
        match self {
            Zoom::Micro => 5,
            Zoom::Entity => 25,
            Zoom::Text => 15,
            Zoom::Unit => 25,
            Zoom::Community => 20,
            Zoom::Corpus => 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pan {
    pub domains: Vec<String>,
    pub keywords: Vec<String>,
    pub entities: Vec<String>,
    pub temporal: Option<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>)>,
}

impl Pan {
    pub const MAX_DOMAINS: usize = 5;
    pub const MAX_KEYWORDS: usize = 10;
    pub const MAX_ENTITIES: usize = 8;
}

/// How to rank what Zoom/Pan put in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tilt {
    Keywords,
    Embedding,
    Graph,
    Temporal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformFormat {
    Json,
    Structured,
    Markdown,
    Conversational,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    Fixed,
    Semantic,
    Adaptive,
    TokenAware,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transform {
    pub max_tokens: usize,
    pub format: TransformFormat,
    pub chunk_strategy: ChunkStrategy,
}

impl Transform {
    pub const MIN_TOKENS: usize = 256;
    pub const MAX_TOKENS: usize = 16384;
    pub const DEFAULT_TOKENS: usize = 4000;
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            max_tokens: Self::DEFAULT_TOKENS,
            format: TransformFormat::Structured,
            chunk_strategy: ChunkStrategy::Adaptive,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("INVALID_ZOOM: {0}")]
    InvalidZoom(String),
    #[error("INVALID_PAN: {0}")]
    InvalidPan(String),
    #[error("INVALID_TILT: {0}")]
    InvalidTilt(String),
    #[error("INVALID_TRANSFORM: {0}")]
    InvalidTransform(String),
}

/// Validates a Pan against its per-facet caps. Zoom has no invalid states
/// (it's a closed enum already); Tilt likewise — both are validated purely
/// by construction. Pan's facet lists are the only part that can overflow
/// caller-supplied limits.
pub fn validate_pan(pan: &Pan) -> Result<(), NavigationError> {
    if pan.domains.len() > Pan::MAX_DOMAINS {
        return Err(NavigationError::InvalidPan(format!(
            "at most {} domains, got {}",
            Pan::MAX_DOMAINS,
            pan.domains.len()
        )));
    }
    if pan.keywords.len() > Pan::MAX_KEYWORDS {
        return Err(NavigationError::InvalidPan(format!(
            "at most {} keywords, got {}",
            Pan::MAX_KEYWORDS,
            pan.keywords.len()
        )));
    }
    if pan.entities.len() > Pan::MAX_ENTITIES {
        return Err(NavigationError::InvalidPan(format!(
            "at most {} entities, got {}",
            Pan::MAX_ENTITIES,
            pan.entities.len()
        )));
    }
    if let Some((start, end)) = pan.temporal {
        if start > end {
            return Err(NavigationError::InvalidPan("temporal range start is after end".to_string()));
        }
    }
    Ok(())
}

pub fn validate_transform(transform: &Transform) -> Result<(), NavigationError> {
    if transform.max_tokens < Transform::MIN_TOKENS || transform.max_tokens > Transform::MAX_TOKENS {
        return Err(NavigationError::InvalidTransform(format!(
            "max_tokens must be within [{}, {}], got {}",
            Transform::MIN_TOKENS,
            Transform::MAX_TOKENS,
            transform.max_tokens
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_caps_match_spec_table() {
        assert_eq!(Zoom::Micro.result_cap(), 5);
        assert_eq!(Zoom::Entity.result_cap(), 25);
        assert_eq!(Zoom::Corpus.result_cap(), 10);
    }

    #[test]
    fn pan_over_cap_is_rejected() {
        let pan = Pan {
            domains: vec!["a".into(); 6],
            ..Default::default()
        };
        assert!(validate_pan(&pan).is_err());
    }

    #[test]
    fn pan_within_cap_is_accepted() {
        let pan = Pan {
            domains: vec!["a".into(); 5],
            ..Default::default()
        };
        assert!(validate_pan(&pan).is_ok());
    }

    #[test]
    fn transform_tokens_out_of_range_is_rejected() {
        let transform = Transform {
            max_tokens: 100,
            ..Default::default()
        };
        assert!(validate_transform(&transform).is_err());
    }
}
