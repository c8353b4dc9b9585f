use crate::uid::SchemaRef;
use thiserror::Error;

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Invalid attribute: {reason}")]
    InvalidAttribute { reason: String },

    #[error("Schema reference must not be empty")]
    EmptyReference,

    /// A snapshot stores a document under a key other than its own uid
    #[error("{collection} entry '{key}' holds document '{uid}'")]
    MismatchedKey {
        collection: &'static str,
        key: SchemaRef,
        uid: SchemaRef,
    },
}

impl SchemaError {
    pub fn invalid_attribute(reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            reason: reason.into(),
        }
    }
}
