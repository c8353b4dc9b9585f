//! # Attribute definitions
//!
//! An attribute is stored as the flat settings object the editor produced,
//! keyed in its schema by the attribute name. The name itself never appears
//! inside the stored value.
//!
//! ```json
//! "compoField": {
//!   "type": "component",
//!   "component": "default.dish",
//!   "repeatable": true,
//!   "min": 1
//! }
//! ```
//!
//! The `type` field selects the variant. Component references and dynamic
//! zone members are lifted into typed fields because dependency resolution
//! reads them; everything else stays verbatim in `settings`, including
//! explicit `null`s.

use crate::error::{SchemaError, SchemaResult};
use crate::uid::SchemaRef;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

pub type AttributeName = String;

/// Attribute settings other than the discriminator and typed fields
pub type Settings = BTreeMap<String, Value>;

pub const TYPE_KEY: &str = "type";
pub const RELATION_TYPE: &str = "relation";
pub const COMPONENT_TYPE: &str = "component";
pub const DYNAMIC_ZONE_TYPE: &str = "dynamiczone";

/// Plain value field kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Text,
    RichText,
    Email,
    Password,
    Uid,
    Enumeration,
    Integer,
    BigInteger,
    Float,
    Decimal,
    Boolean,
    Date,
    Time,
    DateTime,
    Timestamp,
    Media,
    Json,
    /// A field type the editor does not interpret; kept by name
    Other(String),
}

impl ScalarKind {
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name {
            "string" => Self::String,
            "text" => Self::Text,
            "richtext" => Self::RichText,
            "email" => Self::Email,
            "password" => Self::Password,
            "uid" => Self::Uid,
            "enumeration" => Self::Enumeration,
            "integer" => Self::Integer,
            "biginteger" => Self::BigInteger,
            "float" => Self::Float,
            "decimal" => Self::Decimal,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "time" => Self::Time,
            "datetime" => Self::DateTime,
            "timestamp" => Self::Timestamp,
            "media" => Self::Media,
            "json" => Self::Json,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::RichText => "richtext",
            Self::Email => "email",
            Self::Password => "password",
            Self::Uid => "uid",
            Self::Enumeration => "enumeration",
            Self::Integer => "integer",
            Self::BigInteger => "biginteger",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Media => "media",
            Self::Json => "json",
            Self::Other(name) => name,
        }
    }
}

/// Stored definition of one attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeDef {
    Scalar {
        kind: ScalarKind,
        settings: Settings,
    },

    /// Relation to another content type (`nature`, `target`, ... in settings)
    Relation { settings: Settings },

    /// Embedded component (`repeatable`, `min`, `max`, ... in settings)
    Component {
        component: SchemaRef,
        settings: Settings,
    },

    /// Set of alternative components
    DynamicZone {
        components: Vec<SchemaRef>,
        settings: Settings,
    },
}

impl AttributeDef {
    /// Build a definition from its `type` and the remaining fields.
    ///
    /// `fields` must not contain the `type` key; a `name` key is not
    /// expected either, but it is not this layer's job to strip it.
    pub fn from_fields(type_name: &str, mut fields: Settings) -> SchemaResult<Self> {
        if type_name.is_empty() {
            return Err(SchemaError::invalid_attribute("`type` must not be empty"));
        }

        match type_name {
            RELATION_TYPE => Ok(Self::Relation { settings: fields }),

            COMPONENT_TYPE => {
                let component = match fields.remove("component") {
                    Some(Value::String(uid)) => SchemaRef::parse(&uid).map_err(|_| {
                        SchemaError::invalid_attribute("`component` must not be empty")
                    })?,
                    Some(_) => {
                        return Err(SchemaError::invalid_attribute(
                            "`component` must be a component uid",
                        ))
                    }
                    None => {
                        return Err(SchemaError::invalid_attribute(
                            "component attribute is missing its `component` target",
                        ))
                    }
                };

                Ok(Self::Component {
                    component,
                    settings: fields,
                })
            }

            DYNAMIC_ZONE_TYPE => {
                let components = match fields.remove("components") {
                    Some(Value::Array(items)) => items
                        .into_iter()
                        .map(|item| match item {
                            Value::String(uid) if !uid.is_empty() => Ok(SchemaRef::new(uid)),
                            _ => Err(SchemaError::invalid_attribute(
                                "`components` must only contain component uids",
                            )),
                        })
                        .collect::<SchemaResult<Vec<_>>>()?,
                    Some(_) => {
                        return Err(SchemaError::invalid_attribute(
                            "`components` must be an array",
                        ))
                    }
                    None => {
                        return Err(SchemaError::invalid_attribute(
                            "dynamic zone is missing its `components` list",
                        ))
                    }
                };

                Ok(Self::DynamicZone {
                    components,
                    settings: fields,
                })
            }

            other => Ok(Self::Scalar {
                kind: ScalarKind::from_type_name(other),
                settings: fields,
            }),
        }
    }

    /// The `type` discriminator as stored
    pub fn type_name(&self) -> &str {
        match self {
            Self::Scalar { kind, .. } => kind.as_str(),
            Self::Relation { .. } => RELATION_TYPE,
            Self::Component { .. } => COMPONENT_TYPE,
            Self::DynamicZone { .. } => DYNAMIC_ZONE_TYPE,
        }
    }

    pub fn settings(&self) -> &Settings {
        match self {
            Self::Scalar { settings, .. }
            | Self::Relation { settings }
            | Self::Component { settings, .. }
            | Self::DynamicZone { settings, .. } => settings,
        }
    }

    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings().get(key)
    }

    /// Components this attribute pulls into a schema's dependency closure
    pub fn component_refs(&self) -> &[SchemaRef] {
        match self {
            Self::Component { component, .. } => std::slice::from_ref(component),
            Self::DynamicZone { components, .. } => components,
            Self::Scalar { .. } | Self::Relation { .. } => &[],
        }
    }

    pub fn is_repeatable(&self) -> bool {
        match self {
            Self::Component { settings, .. } => settings
                .get("repeatable")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            Self::Scalar { .. } | Self::Relation { .. } | Self::DynamicZone { .. } => false,
        }
    }

    /// Flat JSON form, as it is serialized
    pub fn to_value(&self) -> Value {
        let mut object = serde_json::Map::new();
        object.insert(TYPE_KEY.to_string(), Value::String(self.type_name().to_string()));

        match self {
            Self::Component { component, .. } => {
                object.insert(
                    "component".to_string(),
                    Value::String(component.to_string()),
                );
            }
            Self::DynamicZone { components, .. } => {
                object.insert(
                    "components".to_string(),
                    Value::Array(
                        components
                            .iter()
                            .map(|uid| Value::String(uid.to_string()))
                            .collect(),
                    ),
                );
            }
            Self::Scalar { .. } | Self::Relation { .. } => {}
        }

        for (key, value) in self.settings() {
            object.insert(key.clone(), value.clone());
        }

        Value::Object(object)
    }
}

impl Serialize for AttributeDef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let typed_fields = match self {
            Self::Component { .. } | Self::DynamicZone { .. } => 1,
            Self::Scalar { .. } | Self::Relation { .. } => 0,
        };
        let mut map = serializer.serialize_map(Some(1 + typed_fields + self.settings().len()))?;
        map.serialize_entry(TYPE_KEY, self.type_name())?;

        match self {
            Self::Component { component, .. } => map.serialize_entry("component", component)?,
            Self::DynamicZone { components, .. } => {
                map.serialize_entry("components", components)?
            }
            Self::Scalar { .. } | Self::Relation { .. } => {}
        }

        for (key, value) in self.settings() {
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeDef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Settings::deserialize(deserializer)?;

        let type_name = match fields.remove(TYPE_KEY) {
            Some(Value::String(type_name)) => type_name,
            Some(_) => return Err(D::Error::custom("attribute `type` must be a string")),
            None => return Err(D::Error::custom("attribute is missing its `type`")),
        };

        Self::from_fields(&type_name, fields).map_err(D::Error::custom)
    }
}
