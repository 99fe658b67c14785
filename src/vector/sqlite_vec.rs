//! A `VectorIndex` backed by `sqlite-vec`'s vec0 virtual table.
//!
//! Ported from the teacher's `storage/sqlite_vec.rs`: register the
//! extension once per process via `sqlite3_auto_extension`, L2-normalize
//! vectors on insert so cosine similarity reduces to `1 - dist^2/2`, and
//! partition the vec0 table by corpus id so one table serves every corpus.

use std::sync::{Mutex, Once};

use async_trait::async_trait;
use rusqlite::Connection;

use crate::error::VectorError;
use crate::graph::ElementId;

use super::traits::{ScoredElement, VectorIndex};

static REGISTER_EXTENSION: Once = Once::new();

fn register_vec_extension() {
    REGISTER_EXTENSION.call_once(|| unsafe {
        rusqlite::ffi::sqlite3_auto_extension(Some(std::mem::transmute(
            sqlite_vec::sqlite3_vec_init as *const (),
        )));
    });
}

fn normalize(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        v.to_vec()
    } else {
        v.iter().map(|x| x / norm).collect()
    }
}

pub struct SqliteVecIndex {
    conn: Mutex<Connection>,
    dims: usize,
}

impl SqliteVecIndex {
    pub fn open_in_memory(dims: usize) -> Result<Self, VectorError> {
        register_vec_extension();
        let conn = Connection::open_in_memory().map_err(|e| VectorError::Backend(e.to_string()))?;
        conn.execute_batch(&format!(
            "CREATE VIRTUAL TABLE vec_elements USING vec0(
                context_id TEXT PARTITION KEY,
                element_id TEXT,
                embedding FLOAT[{dims}]
            );"
        ))
        .map_err(|e| VectorError::Backend(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            dims,
        })
    }
}

#[async_trait]
impl VectorIndex for SqliteVecIndex {
    async fn insert(&self, corpus_id: &ElementId, element_id: ElementId, vector: Vec<f32>) -> Result<(), VectorError> {
        if vector.len() != self.dims {
            return Err(VectorError::DimensionMismatch {
                expected: self.dims,
                got: vector.len(),
            });
        }
        let normalized = normalize(&vector);
        let blob: Vec<u8> = normalized.iter().flat_map(|f| f.to_le_bytes()).collect();
        let conn = self.conn.lock().expect("sqlite-vec connection mutex poisoned");
        conn.execute(
            "INSERT INTO vec_elements (context_id, element_id, embedding) VALUES (?1, ?2, ?3)",
            rusqlite::params![corpus_id.as_str(), element_id.as_str(), blob],
        )
        .map_err(|e| VectorError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, corpus_id: &ElementId, element_id: &ElementId) -> Result<(), VectorError> {
        let conn = self.conn.lock().expect("sqlite-vec connection mutex poisoned");
        conn.execute(
            "DELETE FROM vec_elements WHERE context_id = ?1 AND element_id = ?2",
            rusqlite::params![corpus_id.as_str(), element_id.as_str()],
        )
        .map_err(|e| VectorError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn search(&self, corpus_id: &ElementId, query: &[f32], k: usize) -> Result<Vec<ScoredElement>, VectorError> {
        if query.len() != self.dims {
            return Err(VectorError::DimensionMismatch {
                expected: self.dims,
                got: query.len(),
            });
        }
        let normalized = normalize(query);
        let blob: Vec<u8> = normalized.iter().flat_map(|f| f.to_le_bytes()).collect();
        let conn = self.conn.lock().expect("sqlite-vec connection mutex poisoned");
        let mut stmt = conn
            .prepare(
                "SELECT element_id, distance FROM vec_elements
                 WHERE context_id = ?1 AND embedding MATCH ?2 AND k = ?3
                 ORDER BY distance",
            )
            .map_err(|e| VectorError::Backend(e.to_string()))?;
        let rows = stmt
            .query_map(rusqlite::params![corpus_id.as_str(), blob, k as i64], |row| {
                let id: String = row.get(0)?;
                let dist: f64 = row.get(1)?;
                Ok((id, dist))
            })
            .map_err(|e| VectorError::Backend(e.to_string()))?;
        let mut out = Vec::new();
        for row in rows {
            let (id, dist) = row.map_err(|e| VectorError::Backend(e.to_string()))?;
            let similarity = 1.0 - (dist * dist) / 2.0;
            out.push(ScoredElement {
                id: ElementId::from(id),
                score: similarity as f32,
            });
        }
        Ok(out)
    }

    async fn base_layer_edges(&self, _corpus_id: &ElementId) -> Result<Vec<(ElementId, ElementId, f32)>, VectorError> {
        // vec0 is a flat index with no graph structure to surface; callers
        // needing base-layer edges should use `HnswIndex` instead.
        Ok(Vec::new())
    }
}
