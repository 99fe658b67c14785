//! Zoom/Pan/Tilt navigation: selecting which elements are in scope (Zoom),
//! narrowing by facet (Pan), choosing how to rank what's in scope (Tilt),
//! and shaping the result for a caller's token budget (Transform).

mod selector;
mod tilt;
mod transform;
mod types;

pub use selector::select_candidates;
pub use tilt::{apply_tilt, TiltContext};
pub use transform::{transform_result, TransformedResult};
pub use types::{
    validate_pan, validate_transform, ChunkStrategy, NavigationError, Pan, Tilt, Transform,
    TransformFormat, Zoom,
};
