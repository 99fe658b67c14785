//! Navigation sessions: append-only history of the views a caller has
//! taken through the graph, grounded on the teacher's `ProvenanceApi`
//! (chain/mark/link vocabulary mapped onto session/view here).

mod api;
mod types;

pub use api::SessionApi;
pub use types::{NavigationSession, NavigationView};
