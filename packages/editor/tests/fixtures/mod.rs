//! Shared test data: a small restaurant project

#![allow(dead_code)]

use ctb_editor::{ComponentRecord, RawAttribute, SchemaDoc, SchemaStore};
use serde_json::{json, Value};

pub const ADDRESS_UID: &str = "application::address.address";
pub const MENU_UID: &str = "application::menu.menu";

pub fn content_types() -> Vec<SchemaDoc> {
    serde_json::from_value(json!([
        {
            "uid": ADDRESS_UID,
            "schema": {
                "name": "address",
                "description": "",
                "connection": "default",
                "collectionName": "",
                "attributes": {
                    "geolocation": { "type": "json", "required": true },
                    "city": { "type": "string", "required": true },
                    "postal_coder": { "type": "string" },
                    "category": {
                        "type": "relation",
                        "nature": "oneWay",
                        "target": "application::category.category"
                    },
                    "cover": { "type": "media", "multiple": false, "required": false },
                    "images": { "type": "media", "multiple": true, "required": false },
                    "full_name": { "type": "string", "required": true }
                }
            }
        },
        {
            "uid": MENU_UID,
            "schema": {
                "name": "menu",
                "attributes": {
                    "title": { "type": "string" },
                    "opening": {
                        "type": "component",
                        "component": "default.closingperiod",
                        "repeatable": true
                    },
                    "services": {
                        "type": "dynamiczone",
                        "components": ["default.restaurantservice"]
                    }
                }
            }
        }
    ]))
    .unwrap()
}

pub fn components() -> Vec<ComponentRecord> {
    serde_json::from_value(json!([
        {
            "uid": "default.closingperiod",
            "category": "default",
            "schema": {
                "name": "closingperiod",
                "icon": "angry",
                "attributes": {
                    "label": { "type": "string" },
                    "start_date": { "type": "date", "required": true },
                    "end_date": { "type": "date", "required": true },
                    "media": { "type": "media", "multiple": false, "required": false },
                    "dish": {
                        "type": "component",
                        "component": "default.dish",
                        "repeatable": true,
                        "required": true,
                        "min": 2
                    }
                }
            }
        },
        {
            "uid": "default.dish",
            "category": "default",
            "schema": {
                "name": "dish",
                "icon": "address-book",
                "attributes": {
                    "name": { "type": "string", "required": true, "default": "My super dish" },
                    "description": { "type": "text" },
                    "price": { "type": "float" },
                    "picture": { "type": "media", "multiple": false, "required": false },
                    "very_long_description": { "type": "richtext" }
                }
            }
        },
        {
            "uid": "default.restaurantservice",
            "category": "default",
            "schema": {
                "name": "restaurantservice",
                "icon": "cannabis",
                "attributes": {
                    "name": { "type": "string", "required": true, "default": "something" },
                    "media": { "type": "media", "multiple": false, "required": false },
                    "is_available": { "type": "boolean", "required": true, "default": true }
                }
            }
        }
    ]))
    .unwrap()
}

pub fn component(uid: &str) -> ComponentRecord {
    components()
        .into_iter()
        .find(|record| record.uid() == uid)
        .unwrap_or_else(|| panic!("no fixture component {}", uid))
}

pub fn content_type(uid: &str) -> SchemaDoc {
    content_types()
        .into_iter()
        .find(|doc| doc.uid == uid)
        .unwrap_or_else(|| panic!("no fixture content type {}", uid))
}

/// Baseline loaded, nothing opened
pub fn baseline_store() -> SchemaStore {
    SchemaStore::new(content_types(), components())
}

/// Baseline loaded, address content type in the working copy, no working components
pub fn editing_address() -> SchemaStore {
    baseline_store().with_working_content_type(content_type(ADDRESS_UID))
}

pub fn raw(value: Value) -> RawAttribute {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}
