//! Persistence for the graph data model.
//!
//! Grounded on the teacher's `storage` module: a `GraphStore` trait plus
//! two implementations, in-memory and SQLite. Unlike the teacher's
//! `storage/traits.rs`, `data_version()` and `save_session_state()` are
//! declared directly on the trait — the teacher's `engine.rs` calls both on
//! `Arc<dyn GraphStore>` but its own trait definition never declares them,
//! a layering gap this crate closes rather than reproduces.

mod memory;
mod sqlite;
mod traits;

pub use memory::InMemoryGraphStore;
pub use sqlite::SqliteGraphStore;
pub use traits::GraphStore;
