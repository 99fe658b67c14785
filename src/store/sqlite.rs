//! A `GraphStore` backed by SQLite (bundled via `rusqlite`'s `bundled`
//! feature, matching the teacher's storage layer).
//!
//! `rusqlite::Connection` is not `Send` across `.await` points, so every
//! call is dispatched onto `spawn_blocking`, the same pattern the teacher
//! uses around its own blocking SQLite calls.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};

use crate::error::StoreError;
use crate::graph::{Context, Edge, Element, ElementId};

use super::traits::GraphStore;

pub struct SqliteGraphStore {
    conn: Mutex<Connection>,
}

impl SqliteGraphStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS elements (
                corpus_id TEXT NOT NULL,
                id TEXT NOT NULL,
                payload TEXT NOT NULL,
                PRIMARY KEY (corpus_id, id)
            );
            CREATE TABLE IF NOT EXISTS edges (
                corpus_id TEXT NOT NULL,
                id TEXT NOT NULL,
                payload TEXT NOT NULL,
                PRIMARY KEY (corpus_id, id)
            );
            CREATE TABLE IF NOT EXISTS corpus_versions (
                corpus_id TEXT PRIMARY KEY,
                version INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS session_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn bump_version(conn: &Connection, corpus_id: &str) -> Result<(), StoreError> {
        conn.execute(
            "INSERT INTO corpus_versions (corpus_id, version) VALUES (?1, 1)
             ON CONFLICT(corpus_id) DO UPDATE SET version = version + 1",
            params![corpus_id],
        )?;
        Ok(())
    }
}

#[async_trait]
impl GraphStore for SqliteGraphStore {
    async fn load_context(&self, corpus_id: &ElementId) -> Result<Option<Context>, StoreError> {
        let corpus_id = corpus_id.to_string();
        let conn = self.conn.lock().expect("sqlite connection mutex poisoned");

        let mut stmt = conn.prepare("SELECT payload FROM elements WHERE corpus_id = ?1")?;
        let rows = stmt.query_map(params![corpus_id], |row| row.get::<_, String>(0))?;
        let mut elements = Vec::new();
        for row in rows {
            let payload = row?;
            let element: Element =
                serde_json::from_str(&payload).map_err(|e| StoreError::Backend(e.to_string()))?;
            elements.push(element);
        }

        let mut stmt = conn.prepare("SELECT payload FROM edges WHERE corpus_id = ?1")?;
        let rows = stmt.query_map(params![corpus_id], |row| row.get::<_, String>(0))?;
        let mut edges = Vec::new();
        for row in rows {
            let payload = row?;
            let edge: Edge =
                serde_json::from_str(&payload).map_err(|e| StoreError::Backend(e.to_string()))?;
            edges.push(edge);
        }

        if elements.is_empty() && edges.is_empty() {
            return Ok(None);
        }

        let mut ctx = Context::new();
        for e in elements {
            ctx.upsert_element(e);
        }
        for e in edges {
            ctx.add_edge(e);
        }
        Ok(Some(ctx))
    }

    async fn save_element(&self, corpus_id: &ElementId, element: &Element) -> Result<(), StoreError> {
        let corpus_id = corpus_id.to_string();
        let payload = serde_json::to_string(element).map_err(|e| StoreError::Backend(e.to_string()))?;
        let conn = self.conn.lock().expect("sqlite connection mutex poisoned");
        conn.execute(
            "INSERT INTO elements (corpus_id, id, payload) VALUES (?1, ?2, ?3)
             ON CONFLICT(corpus_id, id) DO UPDATE SET payload = excluded.payload",
            params![corpus_id, element.id.as_str(), payload],
        )?;
        Self::bump_version(&conn, &corpus_id)?;
        Ok(())
    }

    async fn save_edge(&self, corpus_id: &ElementId, edge: &Edge) -> Result<(), StoreError> {
        let corpus_id = corpus_id.to_string();
        let payload = serde_json::to_string(edge).map_err(|e| StoreError::Backend(e.to_string()))?;
        let conn = self.conn.lock().expect("sqlite connection mutex poisoned");
        conn.execute(
            "INSERT INTO edges (corpus_id, id, payload) VALUES (?1, ?2, ?3)
             ON CONFLICT(corpus_id, id) DO UPDATE SET payload = excluded.payload",
            params![corpus_id, edge.id.as_str(), payload],
        )?;
        Self::bump_version(&conn, &corpus_id)?;
        Ok(())
    }

    async fn delete_element(&self, corpus_id: &ElementId, element_id: &ElementId) -> Result<(), StoreError> {
        let corpus_id = corpus_id.to_string();
        let conn = self.conn.lock().expect("sqlite connection mutex poisoned");
        conn.execute(
            "DELETE FROM elements WHERE corpus_id = ?1 AND id = ?2",
            params![corpus_id, element_id.as_str()],
        )?;
        Self::bump_version(&conn, &corpus_id)?;
        Ok(())
    }

    async fn data_version(&self, corpus_id: &ElementId) -> Result<u64, StoreError> {
        let corpus_id = corpus_id.to_string();
        let conn = self.conn.lock().expect("sqlite connection mutex poisoned");
        let version: Option<i64> = conn
            .query_row(
                "SELECT version FROM corpus_versions WHERE corpus_id = ?1",
                params![corpus_id],
                |row| row.get(0),
            )
            .ok();
        Ok(version.unwrap_or(0) as u64)
    }

    async fn save_session_state(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().expect("sqlite connection mutex poisoned");
        conn.execute(
            "INSERT INTO session_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    async fn load_session_state(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock().expect("sqlite connection mutex poisoned");
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM session_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .ok();
        Ok(value)
    }
}
