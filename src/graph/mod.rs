//! The heterogeneous graph data model: elements, edges, and the per-corpus
//! context that indexes them.

mod context;
mod edge;
mod element;
mod engine;
mod id;

pub use context::Context;
pub use edge::{Edge, Predicate};
pub use element::{Element, ElementKind, ElementMetadata, Properties, PropertyValue};
pub use engine::GraphEngine;
pub use id::{ElementId, SessionId, ViewId};
