//! Graph algorithms run over a `Context` snapshot.
//!
//! `betweenness` is grounded on the corpus's generic `GraphQuery` Brandes
//! implementation; `ppr` and `kcore` have no corpus precedent and are
//! written from scratch against the spec's exact formulas; `leiden` reports
//! its own unavailability rather than faking community detection it can't
//! actually do (no Leiden crate exists anywhere in the example pack).

mod betweenness;
mod kcore;
mod leiden;
mod ppr;

pub use betweenness::{betweenness_centrality, BetweennessResult};
pub use kcore::{important_entities, KCoreResult};
pub use leiden::{detect_communities, CommunityResult};
pub use ppr::{personalized_pagerank, PprConfig};
