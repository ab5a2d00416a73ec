//! Error types for the store and its persistence boundary.
//!
//! The derivation functions (`health`, `rollup`, `dependencies`) are total
//! and never return errors; failures exist only at the edges: entity
//! lookup, snapshot I/O, and import parsing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid import payload: {0}")]
    InvalidImport(String),

    #[error("Could not resolve a data directory (no home directory)")]
    NoDataDir,
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns true for lookup misses, as opposed to I/O or format failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
