//! # Working copy diff
//!
//! Compares the working copy against the baseline so the UI knows what has
//! to be persisted. Entries shared by pointer with the baseline are equal by
//! construction and cost no comparison.

use ctb_schema::{SchemaRef, SchemaStore};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDiff {
    /// The working content type is new or differs from its baseline
    pub content_type_changed: bool,

    /// The component opened as the main document is new or differs
    pub component_changed: bool,

    /// Working components with no baseline record (or created this session)
    pub added_components: Vec<SchemaRef>,

    /// Working components that differ from their baseline record
    pub modified_components: Vec<SchemaRef>,
}

impl StoreDiff {
    pub fn has_changes(&self) -> bool {
        self.content_type_changed
            || self.component_changed
            || !self.added_components.is_empty()
            || !self.modified_components.is_empty()
    }
}

fn differs<T: PartialEq>(working: &Arc<T>, baseline: Option<&Arc<T>>) -> bool {
    match baseline {
        Some(baseline) => !(Arc::ptr_eq(working, baseline) || **working == **baseline),
        None => true,
    }
}

pub fn diff_working(store: &SchemaStore) -> StoreDiff {
    let content_type_changed = store
        .working_content_type()
        .map(|doc| differs(doc, store.baseline_content_type(doc.uid.as_str())))
        .unwrap_or(false);

    let component_changed = store
        .edited_component()
        .map(|record| {
            record.is_temporary || differs(record, store.baseline_component(record.uid().as_str()))
        })
        .unwrap_or(false);

    let mut diff = StoreDiff {
        content_type_changed,
        component_changed,
        ..StoreDiff::default()
    };

    for (uid, record) in store.working_components().iter() {
        match store.baseline_component(uid.as_str()) {
            _ if record.is_temporary => diff.added_components.push(uid.clone()),
            None => diff.added_components.push(uid.clone()),
            baseline @ Some(_) => {
                if differs(record, baseline) {
                    diff.modified_components.push(uid.clone());
                }
            }
        }
    }

    diff
}
