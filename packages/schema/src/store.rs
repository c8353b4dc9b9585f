//! # Schema Store
//!
//! Immutable value holding the baseline and working copies of every schema
//! in an editing session.
//!
//! ## Sharing
//!
//! Every collection is an `Arc`'d map of `Arc`'d documents. Cloning a store
//! copies four pointers. Writers go through `Arc::make_mut`, so an edit
//! copies only the map spine it touches and the one document it rewrites;
//! every other document stays pointer-equal to the previous store's. The UI
//! relies on that for by-reference change detection.
//!
//! ```text
//! store v1 ──┬── baseline_components ──────────┐
//!            └── working_components ─┐         │
//! store v2 ──┬── (same baseline) ────┼─────────┘
//!            └── working_components' ┴─ shares untouched Arc<ComponentRecord>
//! ```

use crate::document::{ComponentRecord, SchemaDoc};
use crate::error::SchemaError;
use crate::uid::SchemaRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub type SchemaMap<V> = BTreeMap<SchemaRef, Arc<V>>;

/// Copy-on-write collection shared between successive stores
pub type SharedMap<V> = Arc<SchemaMap<V>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoreSnapshot")]
pub struct SchemaStore {
    #[serde(default)]
    baseline_content_types: SharedMap<SchemaDoc>,

    #[serde(default)]
    baseline_components: SharedMap<ComponentRecord>,

    /// The content type under active edit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    working_content_type: Option<Arc<SchemaDoc>>,

    /// The component under active edit, when a component rather than a
    /// content type was opened as the main document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edited_component: Option<Arc<ComponentRecord>>,

    #[serde(default)]
    working_components: SharedMap<ComponentRecord>,
}

/// Serialized form of a store, checked before it becomes one
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreSnapshot {
    #[serde(default)]
    baseline_content_types: SharedMap<SchemaDoc>,

    #[serde(default)]
    baseline_components: SharedMap<ComponentRecord>,

    #[serde(default)]
    working_content_type: Option<Arc<SchemaDoc>>,

    #[serde(default)]
    edited_component: Option<Arc<ComponentRecord>>,

    #[serde(default)]
    working_components: SharedMap<ComponentRecord>,
}

/// Every map entry must be keyed by its document's uid
fn check_keys<V>(
    collection: &'static str,
    map: &SchemaMap<V>,
    uid: impl Fn(&V) -> &SchemaRef,
) -> Result<(), SchemaError> {
    for (key, doc) in map.iter() {
        let found = uid(&**doc);
        if key != found {
            return Err(SchemaError::MismatchedKey {
                collection,
                key: key.clone(),
                uid: found.clone(),
            });
        }
    }
    Ok(())
}

impl TryFrom<StoreSnapshot> for SchemaStore {
    type Error = SchemaError;

    fn try_from(snapshot: StoreSnapshot) -> Result<Self, Self::Error> {
        check_keys("baselineContentTypes", &snapshot.baseline_content_types, |doc| &doc.uid)?;
        check_keys("baselineComponents", &snapshot.baseline_components, ComponentRecord::uid)?;
        check_keys("workingComponents", &snapshot.working_components, ComponentRecord::uid)?;

        Ok(Self {
            baseline_content_types: snapshot.baseline_content_types,
            baseline_components: snapshot.baseline_components,
            working_content_type: snapshot.working_content_type,
            edited_component: snapshot.edited_component,
            working_components: snapshot.working_components,
        })
    }
}

impl SchemaStore {
    /// Start a session from baseline data, with an empty working copy
    pub fn new(
        content_types: impl IntoIterator<Item = SchemaDoc>,
        components: impl IntoIterator<Item = ComponentRecord>,
    ) -> Self {
        Self {
            baseline_content_types: Arc::new(
                content_types
                    .into_iter()
                    .map(|doc| (doc.uid.clone(), Arc::new(doc)))
                    .collect(),
            ),
            baseline_components: Arc::new(
                components
                    .into_iter()
                    .map(|record| (record.uid().clone(), Arc::new(record)))
                    .collect(),
            ),
            working_content_type: None,
            edited_component: None,
            working_components: Arc::default(),
        }
    }

    pub fn baseline_content_types(&self) -> &SharedMap<SchemaDoc> {
        &self.baseline_content_types
    }

    pub fn baseline_components(&self) -> &SharedMap<ComponentRecord> {
        &self.baseline_components
    }

    pub fn baseline_content_type(&self, uid: &str) -> Option<&Arc<SchemaDoc>> {
        self.baseline_content_types.get(uid)
    }

    pub fn baseline_component(&self, uid: &str) -> Option<&Arc<ComponentRecord>> {
        self.baseline_components.get(uid)
    }

    pub fn working_content_type(&self) -> Option<&Arc<SchemaDoc>> {
        self.working_content_type.as_ref()
    }

    pub fn edited_component(&self) -> Option<&Arc<ComponentRecord>> {
        self.edited_component.as_ref()
    }

    pub fn working_components(&self) -> &SharedMap<ComponentRecord> {
        &self.working_components
    }

    pub fn working_component(&self, uid: &str) -> Option<&Arc<ComponentRecord>> {
        self.working_components.get(uid)
    }

    pub fn with_working_content_type(mut self, doc: impl Into<Arc<SchemaDoc>>) -> Self {
        self.set_working_content_type(doc);
        self
    }

    pub fn with_edited_component(mut self, record: impl Into<Arc<ComponentRecord>>) -> Self {
        self.set_edited_component(record);
        self
    }

    /// Add or replace one working component
    pub fn with_working_component(mut self, record: impl Into<Arc<ComponentRecord>>) -> Self {
        self.put_working_component(record);
        self
    }

    pub fn set_working_content_type(&mut self, doc: impl Into<Arc<SchemaDoc>>) {
        self.working_content_type = Some(doc.into());
    }

    pub fn set_edited_component(&mut self, record: impl Into<Arc<ComponentRecord>>) {
        self.edited_component = Some(record.into());
    }

    /// Add or replace one working component
    pub fn put_working_component(&mut self, record: impl Into<Arc<ComponentRecord>>) {
        let record = record.into();
        Arc::make_mut(&mut self.working_components).insert(record.uid().clone(), record);
    }

    /// Replace the whole working components collection
    pub fn replace_working_components(&mut self, components: SchemaMap<ComponentRecord>) {
        self.working_components = Arc::new(components);
    }

    /// Insert the entries whose uid is not a working component yet.
    ///
    /// Present entries are left untouched. When nothing is new the map is
    /// not copied at all. Returns the number of inserted entries.
    pub fn merge_working_components(
        &mut self,
        components: impl IntoIterator<Item = (SchemaRef, Arc<ComponentRecord>)>,
    ) -> usize {
        let fresh: Vec<_> = components
            .into_iter()
            .filter(|(uid, _)| !self.working_components.contains_key(uid))
            .collect();

        if fresh.is_empty() {
            return 0;
        }

        let working = Arc::make_mut(&mut self.working_components);
        let mut inserted = 0;
        for (uid, record) in fresh {
            if let std::collections::btree_map::Entry::Vacant(entry) = working.entry(uid) {
                entry.insert(record);
                inserted += 1;
            }
        }
        inserted
    }

    /// Discard the working copy; the baseline stays shared
    pub fn reset(&self) -> Self {
        Self {
            baseline_content_types: Arc::clone(&self.baseline_content_types),
            baseline_components: Arc::clone(&self.baseline_components),
            working_content_type: None,
            edited_component: None,
            working_components: Arc::default(),
        }
    }

    /// Whether both stores share the same baseline collections
    pub fn shares_baseline_with(&self, other: &SchemaStore) -> bool {
        Arc::ptr_eq(&self.baseline_content_types, &other.baseline_content_types)
            && Arc::ptr_eq(&self.baseline_components, &other.baseline_components)
    }
}
