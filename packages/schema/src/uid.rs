use crate::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a content type (`application::address.address`) or a
/// component (`default.dish`).
///
/// Both kinds share this type; which collection a ref is looked up in
/// decides its namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRef(String);

impl SchemaRef {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Like `new`, but rejects the empty string
    pub fn parse(uid: &str) -> SchemaResult<Self> {
        if uid.is_empty() {
            return Err(SchemaError::EmptyReference);
        }
        Ok(Self(uid.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Category prefix of a component uid (`default` in `default.dish`)
    pub fn category(&self) -> Option<&str> {
        self.0.split_once('.').map(|(category, _)| category)
    }
}

impl fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SchemaRef {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SchemaRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SchemaRef {
    fn from(uid: &str) -> Self {
        Self::new(uid)
    }
}

impl From<String> for SchemaRef {
    fn from(uid: String) -> Self {
        Self(uid)
    }
}

impl PartialEq<str> for SchemaRef {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SchemaRef {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
