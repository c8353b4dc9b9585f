//! # Attribute normalization
//!
//! The form dispatches attributes as one flat object that carries the
//! attribute's `name` next to its settings:
//!
//! ```json
//! { "type": "string", "name": "name", "required": true, "maxLength": 3 }
//! ```
//!
//! Normalizing splits that into the map key (`name`) and the stored
//! definition (everything else, verbatim).

use crate::errors::{EditorError, EditorResult};
use ctb_schema::{AttributeDef, AttributeName, Settings, TYPE_KEY};
use serde_json::Value;

/// Attribute as dispatched by the form
pub type RawAttribute = serde_json::Map<String, Value>;

pub const NAME_KEY: &str = "name";

/// UI-only flags that never reach the stored definition
const TRANSIENT_KEYS: &[&str] = &["createComponent"];

/// Split a raw attribute into its name and stored definition
pub fn normalize(raw: &RawAttribute) -> EditorResult<(AttributeName, AttributeDef)> {
    let name = match raw.get(NAME_KEY) {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        Some(Value::String(_)) => return Err(EditorError::malformed("`name` must not be empty")),
        Some(_) => return Err(EditorError::malformed("`name` must be a string")),
        None => return Err(EditorError::malformed("attribute is missing its `name`")),
    };

    let type_name = match raw.get(TYPE_KEY) {
        Some(Value::String(type_name)) if !type_name.is_empty() => type_name.as_str(),
        Some(Value::String(_)) => return Err(EditorError::malformed("`type` must not be empty")),
        Some(_) => return Err(EditorError::malformed("`type` must be a string")),
        None => {
            return Err(EditorError::malformed(format!(
                "attribute '{}' is missing its `type`",
                name
            )))
        }
    };

    let fields: Settings = raw
        .iter()
        .filter(|(key, _)| {
            key.as_str() != NAME_KEY
                && key.as_str() != TYPE_KEY
                && !TRANSIENT_KEYS.contains(&key.as_str())
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let def = AttributeDef::from_fields(type_name, fields)?;

    Ok((name, def))
}
