//! Error types for the editor

use crate::transition::Target;
use ctb_schema::{SchemaError, SchemaRef};
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Malformed attribute: {reason}")]
    MalformedAttribute { reason: String },

    #[error("Target not found: {target} '{uid}'")]
    TargetNotFound { target: Target, uid: SchemaRef },

    #[error("Unresolved component reference: {uid}")]
    UnresolvedComponentReference { uid: SchemaRef },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedAttribute {
            reason: reason.into(),
        }
    }
}

// Attribute model errors only surface while normalizing caller input
impl From<SchemaError> for EditorError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::InvalidAttribute { reason } => EditorError::MalformedAttribute { reason },
            SchemaError::EmptyReference => {
                EditorError::malformed("schema reference must not be empty")
            }
            mismatch @ SchemaError::MismatchedKey { .. } => {
                EditorError::malformed(mismatch.to_string())
            }
        }
    }
}
