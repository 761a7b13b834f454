//! Error types for global object rendering

use thiserror::Error;

use crate::types::{ObjectKind, Oid};

/// Errors that can occur while rendering global objects
#[derive(Debug, Error)]
pub enum GlobalsError {
    /// The extraction step handed over a record that breaks a kind invariant.
    #[error("Invalid {kind} (oid {oid}) field `{field}`: {reason}")]
    Precondition {
        kind: ObjectKind,
        oid: Oid,
        field: &'static str,
        reason: String,
    },

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GlobalsError {
    pub fn precondition(
        kind: ObjectKind,
        oid: Oid,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::Precondition {
            kind,
            oid,
            field,
            reason: reason.into(),
        }
    }

    pub fn missing(kind: ObjectKind, oid: Oid, field: &'static str) -> Self {
        Self::precondition(kind, oid, field, "must not be empty")
    }

    pub fn object_not_found(msg: impl Into<String>) -> Self {
        Self::ObjectNotFound(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, GlobalsError>;
