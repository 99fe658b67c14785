//! `NavigationSession`/`NavigationView`: the append-only record of what a
//! caller looked at. Mirrors the teacher's `ChainView`/`MarkView` shape
//! (an ordered, never-mutated history) but named for navigation rather
//! than provenance chains.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::{ElementId, SessionId, ViewId};
use crate::navigate::{Pan, Tilt, Zoom};

/// One Zoom/Pan/Tilt request and the element ids it resolved to, recorded
/// in the order it happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationView {
    pub id: ViewId,
    pub zoom: Zoom,
    pub pan: Pan,
    pub tilt: Tilt,
    pub result_ids: Vec<ElementId>,
    pub created_at: DateTime<Utc>,
}

impl NavigationView {
    pub fn new(zoom: Zoom, pan: Pan, tilt: Tilt, result_ids: Vec<ElementId>) -> Self {
        Self {
            id: ViewId::new(),
            zoom,
            pan,
            tilt,
            result_ids,
            created_at: Utc::now(),
        }
    }
}

/// An append-only sequence of views for one corpus, scoped to a session id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationSession {
    pub id: SessionId,
    pub corpus_id: ElementId,
    pub views: Vec<NavigationView>,
    pub created_at: DateTime<Utc>,
}

impl NavigationSession {
    pub fn new(corpus_id: ElementId) -> Self {
        Self {
            id: SessionId::new(),
            corpus_id,
            views: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn record(&mut self, view: NavigationView) {
        self.views.push(view);
    }

    pub fn last_view(&self) -> Option<&NavigationView> {
        self.views.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_accumulate_in_order() {
        let mut session = NavigationSession::new(ElementId::from("c1"));
        session.record(NavigationView::new(Zoom::Entity, Pan::default(), Tilt::Graph, vec![]));
        session.record(NavigationView::new(Zoom::Unit, Pan::default(), Tilt::Keywords, vec![]));
        assert_eq!(session.views.len(), 2);
        assert_eq!(session.last_view().unwrap().zoom, Zoom::Unit);
    }
}
