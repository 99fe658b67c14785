//! `SessionApi`: create sessions, append views, read back history.
//!
//! Grounded on the teacher's `ProvenanceApi<'a>`, which wraps a context
//! reference and exposes chain/mark CRUD; this wraps an optional store
//! instead of a context, since navigation history isn't part of the graph
//! data model itself.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::ErrorKind;
use crate::graph::{ElementId, SessionId};
use crate::store::GraphStore;

use super::types::{NavigationSession, NavigationView};

pub struct SessionApi {
    sessions: DashMap<SessionId, NavigationSession>,
    store: Option<Arc<dyn GraphStore>>,
}

impl SessionApi {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            store: None,
        }
    }

    pub fn with_store(store: Arc<dyn GraphStore>) -> Self {
        Self {
            sessions: DashMap::new(),
            store: Some(store),
        }
    }

    pub fn create_session(&self, corpus_id: ElementId) -> SessionId {
        let session = NavigationSession::new(corpus_id);
        let id = session.id.clone();
        self.sessions.insert(id.clone(), session);
        id
    }

    pub fn get_session(&self, session_id: &SessionId) -> Option<NavigationSession> {
        self.sessions.get(session_id).map(|s| s.clone())
    }

    /// Appends a view to a session's history and, if a store is attached,
    /// persists the whole session under its id.
    pub async fn record_view(&self, session_id: &SessionId, view: NavigationView) -> Result<(), ErrorKind> {
        {
            let mut session = self
                .sessions
                .get_mut(session_id)
                .ok_or_else(|| ErrorKind::NotFound(session_id.to_string()))?;
            session.record(view);
        }
        if let Some(store) = &self.store {
            let session = self.sessions.get(session_id).expect("just inserted above");
            let payload = serde_json::to_string(&*session).map_err(|e| ErrorKind::Internal(e.to_string()))?;
            store.save_session_state(session_id.as_str(), &payload).await?;
        }
        Ok(())
    }

    pub fn list_views(&self, session_id: &SessionId) -> Vec<NavigationView> {
        self.sessions.get(session_id).map(|s| s.views.clone()).unwrap_or_default()
    }
}

impl Default for SessionApi {
    fn default() -> Self {
        Self::new()
    }
}
