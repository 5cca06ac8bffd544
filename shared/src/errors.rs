//! Error types for the FitPlan progress engine

use thiserror::Error;

/// Plan-level error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown plan kind: {0}")]
    UnknownKind(String),
}

/// Storage boundary error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Corrupt payload for key {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
