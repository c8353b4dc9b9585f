//! # Store transitions
//!
//! Pure functions from `(store, edit)` to a new store. The input store is
//! never modified; on error nothing of the new store escapes.
//!
//! ## Add attribute
//!
//! 1. Normalize the raw attribute into `(name, definition)`
//! 2. Find the working document addressed by `(forTarget, targetUid)`
//! 3. Write the definition under `name` (overwrites, never appends)
//! 4. Mirror self-referencing relations under their `targetAttribute`
//! 5. If asked to, pull the referenced components and everything they
//!    depend on into the working components

use crate::errors::{EditorError, EditorResult};
use crate::normalizer::{normalize, RawAttribute};
use crate::resolver::{
    ComponentSources, DependencyResolver, TemporaryRegistry, UnresolvedPolicy,
};
use ctb_schema::{
    AttributeDef, AttributeName, ComponentRecord, SchemaDoc, SchemaMap, SchemaRef, SchemaStore,
    Settings,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

static NO_TEMPORARY_COMPONENTS: TemporaryRegistry = TemporaryRegistry::new();

/// Which working document an edit addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    /// The content type under active edit
    ContentType,

    /// An entry of the working components, by uid
    Components,

    /// The component opened as the main document
    Component,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Target::ContentType => "contentType",
            Target::Components => "components",
            Target::Component => "component",
        };
        f.write_str(name)
    }
}

/// Everything a transition reads besides the store
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub temporary: &'a TemporaryRegistry,
    pub policy: UnresolvedPolicy,
}

impl<'a> TransitionContext<'a> {
    pub fn new(temporary: &'a TemporaryRegistry, policy: UnresolvedPolicy) -> Self {
        Self { temporary, policy }
    }

    /// Resolver over the store's baseline, then the temporary registry
    pub fn resolver(&self, store: &'a SchemaStore) -> DependencyResolver<'a> {
        let baseline: &'a SchemaMap<ComponentRecord> = store.baseline_components();
        DependencyResolver::new(
            ComponentSources::new().chain(baseline).chain(self.temporary),
            self.policy,
        )
    }
}

impl Default for TransitionContext<'static> {
    fn default() -> Self {
        Self::new(&NO_TEMPORARY_COMPONENTS, UnresolvedPolicy::default())
    }
}

/// Payload of an `ADD_ATTRIBUTE` edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAttribute {
    pub attribute_to_set: RawAttribute,
    pub for_target: Target,
    pub target_uid: SchemaRef,

    /// Previous state of the attribute when the form edits one in place.
    /// Recorded only; no key is ever removed because of it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_attribute: Option<RawAttribute>,

    /// Pull referenced components into the working copy
    #[serde(default)]
    pub should_add_component_to_data: bool,
}

impl AddAttribute {
    pub fn new(for_target: Target, target_uid: impl Into<SchemaRef>, attribute: RawAttribute) -> Self {
        Self {
            attribute_to_set: attribute,
            for_target,
            target_uid: target_uid.into(),
            initial_attribute: None,
            should_add_component_to_data: false,
        }
    }

    pub fn with_component_propagation(mut self, propagate: bool) -> Self {
        self.should_add_component_to_data = propagate;
        self
    }

    pub fn with_initial_attribute(mut self, initial: RawAttribute) -> Self {
        self.initial_attribute = Some(initial);
        self
    }
}

/// Apply an `ADD_ATTRIBUTE` edit
pub fn add_attribute(
    store: &SchemaStore,
    edit: &AddAttribute,
    ctx: &TransitionContext<'_>,
) -> EditorResult<SchemaStore> {
    let target_not_found = || EditorError::TargetNotFound {
        target: edit.for_target,
        uid: edit.target_uid.clone(),
    };

    let (name, def) = normalize(&edit.attribute_to_set)?;

    if let Some(initial) = edit.initial_attribute.as_ref().filter(|a| !a.is_empty()) {
        tracing::debug!(
            "[AddAttribute] initial attribute {:?} recorded, '{}' written in place",
            initial.get("name"),
            name
        );
    }

    let mut next = store.clone();

    match edit.for_target {
        Target::ContentType => {
            let doc = store
                .working_content_type()
                .filter(|doc| doc.uid == edit.target_uid)
                .ok_or_else(target_not_found)?;

            let mut updated = SchemaDoc::clone(doc);
            write_attribute(&mut updated, &name, def.clone());
            next.set_working_content_type(updated);
        }

        Target::Components => {
            let record = store
                .working_component(edit.target_uid.as_str())
                .ok_or_else(target_not_found)?;

            let mut updated = (**record).clone();
            write_attribute(&mut updated.doc, &name, def.clone());
            next.put_working_component(updated);
        }

        Target::Component => {
            let record = store
                .edited_component()
                .filter(|record| *record.uid() == edit.target_uid)
                .ok_or_else(target_not_found)?;

            let mut updated = (**record).clone();
            write_attribute(&mut updated.doc, &name, def.clone());
            next.set_edited_component(updated);
        }
    }

    tracing::debug!(
        "[AddAttribute] {} '{}' <- {} ({})",
        edit.for_target,
        edit.target_uid,
        name,
        def.type_name()
    );

    if edit.should_add_component_to_data {
        propagate_components(store, &mut next, &def, ctx)?;
    }

    Ok(next)
}

/// Merge the dependency closure of `def`'s component references
fn propagate_components(
    store: &SchemaStore,
    next: &mut SchemaStore,
    def: &AttributeDef,
    ctx: &TransitionContext<'_>,
) -> EditorResult<()> {
    let roots = match def {
        AttributeDef::Component { .. } | AttributeDef::DynamicZone { .. } => def.component_refs(),
        AttributeDef::Scalar { .. } | AttributeDef::Relation { .. } => return Ok(()),
    };

    if roots.is_empty() {
        return Ok(());
    }

    let mut resolver = ctx.resolver(store);
    if let Some(edited) = next.edited_component() {
        resolver = resolver.with_present(edited.uid().clone());
    }
    let closure = resolver.resolve_all(roots, next.working_components())?;

    let added = next.merge_working_components(closure.to_add);
    tracing::debug!(
        "[AddAttribute] {} component(s) added to the working copy, {} skipped",
        added,
        closure.skipped.len()
    );

    Ok(())
}

/// Write `def` under `name`, plus the opposite side of a relation that
/// points back at the same document
fn write_attribute(doc: &mut SchemaDoc, name: &str, def: AttributeDef) {
    let opposite = opposite_relation(&doc.uid, name, &def);
    doc.set_attribute(name, def);

    if let Some((opposite_name, opposite_def)) = opposite {
        tracing::debug!(
            "[AddAttribute] mirroring relation '{}' as '{}' on {}",
            name,
            opposite_name,
            doc.uid
        );
        doc.set_attribute(opposite_name, opposite_def);
    }
}

fn opposite_relation(
    owner: &SchemaRef,
    name: &str,
    def: &AttributeDef,
) -> Option<(AttributeName, AttributeDef)> {
    let settings = match def {
        AttributeDef::Relation { settings } => settings,
        AttributeDef::Scalar { .. }
        | AttributeDef::Component { .. }
        | AttributeDef::DynamicZone { .. } => return None,
    };

    let target = settings.get("target").and_then(Value::as_str)?;
    if target != owner.as_str() {
        return None;
    }

    let nature = settings.get("nature").and_then(Value::as_str)?;
    if matches!(nature, "oneWay" | "manyWay") {
        return None;
    }

    let target_attribute = settings
        .get("targetAttribute")
        .and_then(Value::as_str)
        .filter(|attribute| !attribute.is_empty() && *attribute != name)?;

    let mut mirrored = Settings::new();
    mirrored.insert("nature".to_string(), Value::from(opposite_nature(nature)));
    mirrored.insert("target".to_string(), Value::from(target));
    mirrored.insert("targetAttribute".to_string(), Value::from(name));

    for key in ["unique", "required"] {
        if let Some(value) = settings.get(key) {
            mirrored.insert(key.to_string(), value.clone());
        }
    }

    let dominant = if nature == "manyToMany" {
        let dominant = settings
            .get("dominant")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        Value::Bool(!dominant)
    } else {
        Value::Null
    };
    mirrored.insert("dominant".to_string(), dominant);

    // Column names swap sides
    if let Some(column) = settings.get("targetColumnName") {
        mirrored.insert("columnName".to_string(), column.clone());
    }
    if let Some(column) = settings.get("columnName") {
        mirrored.insert("targetColumnName".to_string(), column.clone());
    }

    Some((
        target_attribute.to_string(),
        AttributeDef::Relation { settings: mirrored },
    ))
}

fn opposite_nature(nature: &str) -> &str {
    match nature {
        "oneToMany" => "manyToOne",
        "manyToOne" => "oneToMany",
        other => other,
    }
}

/// Start editing a baseline content type.
///
/// The working components become the content type's dependency closure.
pub fn open_content_type(
    store: &SchemaStore,
    uid: &SchemaRef,
    ctx: &TransitionContext<'_>,
) -> EditorResult<SchemaStore> {
    let doc = store
        .baseline_content_type(uid.as_str())
        .ok_or_else(|| EditorError::TargetNotFound {
            target: Target::ContentType,
            uid: uid.clone(),
        })?;

    let closure = ctx
        .resolver(store)
        .resolve_all(doc.component_refs(), &SchemaMap::new())?;

    let mut next = store.reset();
    next.set_working_content_type(Arc::clone(doc));
    next.replace_working_components(closure.to_add);

    tracing::debug!(
        "[Open] content type {} with {} component(s)",
        uid,
        next.working_components().len()
    );

    Ok(next)
}

/// Start editing a component as the main document.
///
/// Temporary components can be opened too; the working components become
/// the component's dependency closure, minus the component itself.
pub fn open_component(
    store: &SchemaStore,
    uid: &SchemaRef,
    ctx: &TransitionContext<'_>,
) -> EditorResult<SchemaStore> {
    let record = store
        .baseline_component(uid.as_str())
        .or_else(|| ctx.temporary.get(uid.as_str()))
        .ok_or_else(|| EditorError::TargetNotFound {
            target: Target::Component,
            uid: uid.clone(),
        })?;

    let closure = ctx
        .resolver(store)
        .with_present(uid.clone())
        .resolve_all(record.component_refs(), &SchemaMap::new())?;

    let mut next = store.reset();
    next.set_edited_component(Arc::clone(record));
    next.replace_working_components(closure.to_add);

    tracing::debug!(
        "[Open] component {} with {} component(s)",
        uid,
        next.working_components().len()
    );

    Ok(next)
}
