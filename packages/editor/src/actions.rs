//! # Edit actions
//!
//! Actions are dispatched by the rendering layer as JSON objects tagged by
//! `type`:
//!
//! ```json
//! {
//!   "type": "ADD_ATTRIBUTE",
//!   "attributeToSet": { "type": "string", "name": "city" },
//!   "forTarget": "contentType",
//!   "targetUid": "application::address.address",
//!   "initialAttribute": {},
//!   "shouldAddComponentToData": false
//! }
//! ```
//!
//! Applying an action is a pure transition: the input store is left as is
//! and a new store is returned.

use crate::errors::EditorResult;
use crate::transition::{add_attribute, AddAttribute, TransitionContext};
use ctb_schema::SchemaStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Write an attribute into a working schema
    AddAttribute(AddAttribute),
}

impl Action {
    /// Apply this action, producing the next store
    pub fn apply(
        &self,
        store: &SchemaStore,
        ctx: &TransitionContext<'_>,
    ) -> EditorResult<SchemaStore> {
        match self {
            Action::AddAttribute(edit) => add_attribute(store, edit, ctx),
        }
    }

    /// Get a debug name for this action
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddAttribute(_) => "ADD_ATTRIBUTE",
        }
    }
}

impl From<AddAttribute> for Action {
    fn from(edit: AddAttribute) -> Self {
        Action::AddAttribute(edit)
    }
}
