//! Vector similarity search over element embeddings.
//!
//! `hnsw` is the in-process default, generalizing the SNSW-style DashMap
//! structure from the corpus into a true layered, seeded HNSW so that
//! `base_layer_edges()` is deterministic for a fixed seed. `sqlite_vec`
//! (feature `embeddings`) is a thin wrapper over the teacher's
//! `storage/sqlite_vec.rs` vec0 virtual table for durable installs.

mod hnsw;
#[cfg(feature = "embeddings")]
mod sqlite_vec;
mod traits;

pub use hnsw::{HnswConfig, HnswIndex};
#[cfg(feature = "embeddings")]
pub use sqlite_vec::SqliteVecIndex;
pub use traits::{ScoredElement, VectorIndex};
