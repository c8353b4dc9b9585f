use crate::attribute::{AttributeDef, AttributeName, Settings};
use crate::uid::SchemaRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Attributes = BTreeMap<AttributeName, AttributeDef>;

/// The `schema` object of a content type or component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub name: String,

    /// Components only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default)]
    pub attributes: Attributes,

    /// Keys the editor does not interpret (`description`, `collectionName`, ...)
    #[serde(flatten)]
    pub extra: Settings,
}

/// A content type or component schema, addressed by its uid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDoc {
    pub uid: SchemaRef,

    /// Components only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub schema: Schema,

    /// Document-level keys the editor does not interpret
    #[serde(flatten)]
    pub extra: Settings,
}

impl SchemaDoc {
    pub fn new(uid: impl Into<SchemaRef>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            category: None,
            schema: Schema {
                name: name.into(),
                ..Schema::default()
            },
            extra: Settings::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.schema.icon = Some(icon.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<AttributeName>, def: AttributeDef) -> Self {
        self.set_attribute(name, def);
        self
    }

    pub fn attributes(&self) -> &Attributes {
        &self.schema.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.schema.attributes.get(name)
    }

    /// Write `def` under `name`, returning the definition it replaced
    pub fn set_attribute(
        &mut self,
        name: impl Into<AttributeName>,
        def: AttributeDef,
    ) -> Option<AttributeDef> {
        self.schema.attributes.insert(name.into(), def)
    }

    /// Every component referenced by an attribute of this schema
    pub fn component_refs(&self) -> impl Iterator<Item = &SchemaRef> {
        self.schema
            .attributes
            .values()
            .flat_map(|def| def.component_refs().iter())
    }
}

/// A component schema together with its session status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    #[serde(flatten)]
    pub doc: SchemaDoc,

    /// Created in this editing session, unknown to the baseline
    #[serde(default, rename = "isTemporary", skip_serializing_if = "is_false")]
    pub is_temporary: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ComponentRecord {
    pub fn new(doc: SchemaDoc) -> Self {
        Self {
            doc,
            is_temporary: false,
        }
    }

    pub fn temporary(doc: SchemaDoc) -> Self {
        Self {
            doc,
            is_temporary: true,
        }
    }

    pub fn uid(&self) -> &SchemaRef {
        &self.doc.uid
    }

    pub fn component_refs(&self) -> impl Iterator<Item = &SchemaRef> {
        self.doc.component_refs()
    }
}

impl From<SchemaDoc> for ComponentRecord {
    fn from(doc: SchemaDoc) -> Self {
        Self::new(doc)
    }
}
