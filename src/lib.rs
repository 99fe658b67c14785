//! graphloom: a graph-augmented retrieval engine.
//!
//! Raw text is decomposed into a typed knowledge graph (`graph`), indexed
//! for both exact and vector search (`store`, `vector`), analyzed with
//! graph algorithms to surface what matters (`algo`), and navigated through
//! a Zoom/Pan/Tilt interface that shapes results to a caller's token budget
//! (`navigate`). `decompose` wires extraction, augmentation, community
//! detection, and embedding enrichment into one pipeline; `session` records
//! the history of what a caller navigated to.
//!
//! # Example
//!
//! ```
//! use graphloom::RetrievalEngine;
//!
//! let engine = RetrievalEngine::new();
//! // Engine is ready to decompose text and answer navigation queries.
//! ```

pub mod adapter;
pub mod algo;
pub mod concurrency;
pub mod config;
pub mod decompose;
mod graph;
pub mod navigate;
pub mod search;
pub mod session;
pub mod store;
pub mod vector;

mod error;
mod facade;

pub use adapter::{EmbeddingAdapter, LlmAdapter, MockEmbeddingAdapter, MockLlmAdapter};
pub use algo::{
    betweenness_centrality, detect_communities, important_entities, personalized_pagerank,
    BetweennessResult, CommunityResult, KCoreResult, PprConfig,
};
pub use concurrency::{BoundedAdapter, CancellationToken, RateLimiter, SingleFlightCache};
pub use config::{AlgorithmConfig, ConcurrencyConfig, ConfigError, EngineConfig, VectorIndexConfig};
pub use decompose::{run_decomposition, DecompositionReport, ExtractionOutcome};
pub use error::{AdapterError, AlgoError, EngineResult, ErrorKind, StoreError, VectorError};
pub use facade::RetrievalEngine;
pub use graph::{
    Context, Edge, Element, ElementId, ElementKind, ElementMetadata, GraphEngine, Predicate,
    Properties, PropertyValue, SessionId, ViewId,
};
pub use navigate::{
    validate_pan, validate_transform, ChunkStrategy, NavigationError, Pan, Tilt, TiltContext,
    Transform, TransformFormat, Zoom,
};
pub use search::{dual_search, filter_retrievable, ppr_traverse, DualSearchResult, PprTraversalResult};
pub use session::{NavigationSession, NavigationView, SessionApi};
pub use store::{GraphStore, InMemoryGraphStore, SqliteGraphStore};
pub use vector::{HnswConfig, HnswIndex, ScoredElement, VectorIndex};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
