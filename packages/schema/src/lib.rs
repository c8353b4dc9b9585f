//! # Content-Type Builder schema model
//!
//! Content types, components and their attributes as the editor stores
//! them, plus the persistent [`SchemaStore`] that holds the baseline and
//! working copies side by side.

mod attribute;
mod document;
mod error;
mod store;
mod uid;

pub use attribute::{
    AttributeDef, AttributeName, ScalarKind, Settings, COMPONENT_TYPE, DYNAMIC_ZONE_TYPE,
    RELATION_TYPE, TYPE_KEY,
};
pub use document::{Attributes, ComponentRecord, Schema, SchemaDoc};
pub use error::{SchemaError, SchemaResult};
pub use store::{SchemaMap, SchemaStore, SharedMap};
pub use uid::SchemaRef;
