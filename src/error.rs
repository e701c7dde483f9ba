//! Error types for shape derivation and filtering

use thiserror::Error;

/// Result type for shape operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Shape toolkit errors
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A node could not be classified or has no storage representation.
    /// Always a schema-definition defect; the whole call is aborted.
    #[error("Unsupported shape kind at {path}: {reason}")]
    UnsupportedShapeKind { path: String, reason: String },

    #[error("Unknown primitive '{name}' at {path}")]
    UnknownPrimitive { name: String, path: String },

    #[error("Invalid shape document: {0}")]
    InvalidFormat(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Semver error: {0}")]
    Semver(#[from] semver::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl SchemaError {
    pub fn unsupported(path: impl ToString, reason: impl Into<String>) -> Self {
        Self::UnsupportedShapeKind {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
