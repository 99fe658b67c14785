//! Unified error taxonomy shared by every layer.
//!
//! Per-layer errors (`StoreError`, `VectorError`, `AlgoError`, `AdapterError`)
//! stay distinct types close to where they're raised; they convert into
//! `ErrorKind` via `From` at the point they cross into the pipeline.

use thiserror::Error;

/// Transport-neutral error taxonomy. Every variant knows whether retrying
/// makes sense.
#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("adapter unavailable: {0}")]
    Unavailable(String),

    #[error("operation timed out: {0}")]
    Timeout(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("cancelled")]
    Cancelled,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    /// Whether a caller should retry this error. Mirrors the propagation
    /// policy: `Unavailable`/`RateLimited` are retriable, `Timeout` is
    /// retriable once at most (the caller enforces the "once" part), every
    /// other kind is a terminal failure for this request.
    pub fn retriable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Unavailable(_) | ErrorKind::Timeout(_) | ErrorKind::RateLimited(_)
        )
    }

    /// The machine-readable code used in the external result envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput(_) => "InvalidInput",
            ErrorKind::NotFound(_) => "NotFound",
            ErrorKind::Conflict(_) => "Conflict",
            ErrorKind::DimensionMismatch { .. } => "DimensionMismatch",
            ErrorKind::Unavailable(_) => "Unavailable",
            ErrorKind::Timeout(_) => "Timeout",
            ErrorKind::RateLimited(_) => "RateLimited",
            ErrorKind::Cancelled => "Cancelled",
            ErrorKind::Internal(_) => "Internal",
        }
    }
}

pub type EngineResult<T> = Result<T, ErrorKind>;

/// Errors raised by `GraphStore` implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("element not found: {0}")]
    NotFound(String),
    #[error("element {0} changed kind under an existing id")]
    KindConflict(String),
    #[error("required attribute missing: {0}")]
    MissingAttribute(String),
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for ErrorKind {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ErrorKind::NotFound(id),
            StoreError::KindConflict(id) => ErrorKind::Conflict(id),
            StoreError::MissingAttribute(a) => ErrorKind::InvalidInput(a),
            StoreError::Unavailable(m) => ErrorKind::Unavailable(m),
            StoreError::Backend(m) => ErrorKind::Internal(m),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Errors raised by `VectorIndex` implementations.
#[derive(Debug, Error)]
pub enum VectorError {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("vector backend error: {0}")]
    Backend(String),
}

impl From<VectorError> for ErrorKind {
    fn from(e: VectorError) -> Self {
        match e {
            VectorError::DimensionMismatch { expected, got } => {
                ErrorKind::DimensionMismatch { expected, got }
            }
            VectorError::Backend(m) => ErrorKind::Internal(m),
        }
    }
}

/// Errors raised by graph algorithms.
#[derive(Debug, Error)]
pub enum AlgoError {
    #[error("empty graph")]
    EmptyGraph,
    #[error("algorithm precondition violated: {0}")]
    Precondition(String),
}

impl From<AlgoError> for ErrorKind {
    fn from(e: AlgoError) -> Self {
        ErrorKind::Internal(e.to_string())
    }
}

/// Errors raised by `LlmAdapter`/`EmbeddingAdapter` calls.
#[derive(Debug, Error, Clone)]
pub enum AdapterError {
    #[error("adapter call failed: {0}")]
    Failed(String),
    #[error("adapter call timed out")]
    Timeout,
    #[error("adapter call cancelled")]
    Cancelled,
}

impl From<AdapterError> for ErrorKind {
    fn from(e: AdapterError) -> Self {
        match e {
            AdapterError::Failed(m) => ErrorKind::Unavailable(m),
            AdapterError::Timeout => ErrorKind::Timeout("adapter call".to_string()),
            AdapterError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_is_retriable() {
        assert!(ErrorKind::Unavailable("x".into()).retriable());
    }

    #[test]
    fn invalid_input_is_not_retriable() {
        assert!(!ErrorKind::InvalidInput("x".into()).retriable());
    }

    #[test]
    fn codes_match_taxonomy() {
        assert_eq!(ErrorKind::NotFound("x".into()).code(), "NotFound");
        assert_eq!(ErrorKind::Cancelled.code(), "Cancelled");
    }

    #[test]
    fn store_not_found_maps_to_not_found() {
        let e: ErrorKind = StoreError::NotFound("abc".into()).into();
        assert_eq!(e.code(), "NotFound");
    }
}
