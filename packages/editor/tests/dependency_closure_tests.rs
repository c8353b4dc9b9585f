//! Dependency closure behaviour through the public transitions

mod fixtures;

use ctb_editor::{
    add_attribute, open_component, open_content_type, AddAttribute, ComponentRecord, EditorError,
    SchemaDoc, SchemaRef, SchemaStore, Target, TemporaryRegistry, TransitionContext,
    UnresolvedPolicy,
};
use fixtures::{editing_address, raw, ADDRESS_UID, MENU_UID};
use serde_json::json;
use std::sync::Arc;

fn component_with_refs(uid: &str, refs: &[&str]) -> ComponentRecord {
    let attributes: serde_json::Map<_, _> = refs
        .iter()
        .map(|target| {
            (
                format!("to_{}", target.replace('.', "_")),
                json!({ "type": "component", "component": target, "repeatable": false }),
            )
        })
        .collect();

    serde_json::from_value(json!({
        "uid": uid,
        "category": "default",
        "schema": { "name": uid, "icon": "cube", "attributes": attributes }
    }))
    .unwrap()
}

fn cyclic_store() -> SchemaStore {
    SchemaStore::new(
        vec![SchemaDoc::new(ADDRESS_UID, "address")],
        vec![
            component_with_refs("default.x", &["default.y"]),
            component_with_refs("default.y", &["default.x", "default.z"]),
            component_with_refs("default.z", &["default.z"]),
        ],
    )
    .with_working_content_type(SchemaDoc::new(ADDRESS_UID, "address"))
}

fn link_to(uid: &str) -> AddAttribute {
    AddAttribute::new(
        Target::ContentType,
        ADDRESS_UID,
        raw(json!({ "type": "component", "name": "link", "component": uid })),
    )
    .with_component_propagation(true)
}

#[test]
fn test_cyclic_components_resolve_once_each() {
    let state = cyclic_store();

    let next = add_attribute(&state, &link_to("default.x"), &TransitionContext::default()).unwrap();

    let uids: Vec<_> = next.working_components().keys().map(SchemaRef::as_str).collect();
    assert_eq!(uids, vec!["default.x", "default.y", "default.z"]);
}

#[test]
fn test_every_reachable_component_is_present() {
    let state = cyclic_store();
    let next = add_attribute(&state, &link_to("default.y"), &TransitionContext::default()).unwrap();

    // The working copy is closed under component references
    for record in next.working_components().values() {
        for nested in record.component_refs() {
            assert!(
                next.working_components().contains_key(nested),
                "{} references missing {}",
                record.uid(),
                nested
            );
        }
    }
}

#[test]
fn test_rerunning_does_not_replace_working_entries() {
    let state = cyclic_store();
    let ctx = TransitionContext::default();

    let first = add_attribute(&state, &link_to("default.x"), &ctx).unwrap();
    let second = add_attribute(&first, &link_to("default.y"), &ctx).unwrap();

    assert!(Arc::ptr_eq(first.working_components(), second.working_components()));
    for (uid, record) in first.working_components().iter() {
        assert!(Arc::ptr_eq(record, second.working_component(uid.as_str()).unwrap()));
    }
}

#[test]
fn test_unresolved_reference_aborts_atomically() {
    let state = editing_address();
    let before = state.clone();

    let err = add_attribute(
        &state,
        &link_to("default.does-not-exist"),
        &TransitionContext::default(),
    )
    .unwrap_err();

    match err {
        EditorError::UnresolvedComponentReference { uid } => {
            assert_eq!(uid, "default.does-not-exist")
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(state, before);
    assert!(state
        .working_content_type()
        .unwrap()
        .attribute("link")
        .is_none());
}

#[test]
fn test_unresolved_nested_reference_can_be_skipped() {
    let state = SchemaStore::new(
        vec![],
        vec![component_with_refs("default.broken", &["default.gone"])],
    )
    .with_working_content_type(SchemaDoc::new(ADDRESS_UID, "address"));

    let registry = TemporaryRegistry::new();
    let ctx = TransitionContext::new(&registry, UnresolvedPolicy::Skip);

    let next = add_attribute(&state, &link_to("default.broken"), &ctx).unwrap();

    assert!(next.working_component("default.broken").is_some());
    assert!(next.working_component("default.gone").is_none());
    assert!(next
        .working_content_type()
        .unwrap()
        .attribute("link")
        .is_some());
}

#[test]
fn test_temporary_components_are_resolvable() {
    let state = editing_address();
    let mut registry = TemporaryRegistry::new();
    registry.register(component_with_refs("default.new-compo", &["default.dish"]));
    let ctx = TransitionContext::new(&registry, UnresolvedPolicy::Abort);

    let next = add_attribute(&state, &link_to("default.new-compo"), &ctx).unwrap();

    let created = next.working_component("default.new-compo").unwrap();
    assert!(created.is_temporary);
    assert!(next.working_component("default.dish").is_some());
}

#[test]
fn test_open_content_type_loads_its_closure() {
    let store = fixtures::baseline_store();

    let next = open_content_type(&store, &SchemaRef::new(MENU_UID), &TransitionContext::default())
        .unwrap();

    let uids: Vec<_> = next.working_components().keys().map(SchemaRef::as_str).collect();
    assert_eq!(
        uids,
        vec!["default.closingperiod", "default.dish", "default.restaurantservice"]
    );
    assert!(Arc::ptr_eq(
        next.working_content_type().unwrap(),
        store.baseline_content_type(MENU_UID).unwrap()
    ));
    for (uid, record) in next.working_components().iter() {
        assert!(Arc::ptr_eq(record, store.baseline_component(uid.as_str()).unwrap()));
    }
}

#[test]
fn test_open_component_loads_nested_components() {
    let store = fixtures::baseline_store();

    let next = open_component(
        &store,
        &SchemaRef::new("default.closingperiod"),
        &TransitionContext::default(),
    )
    .unwrap();

    assert_eq!(next.edited_component().unwrap().uid(), "default.closingperiod");
    let uids: Vec<_> = next.working_components().keys().map(SchemaRef::as_str).collect();
    assert_eq!(uids, vec!["default.dish"]);
}

#[test]
fn test_open_unknown_content_type() {
    let store = fixtures::baseline_store();

    let err = open_content_type(
        &store,
        &SchemaRef::new("application::nope.nope"),
        &TransitionContext::default(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        EditorError::TargetNotFound {
            target: Target::ContentType,
            ..
        }
    ));
}

#[test]
fn test_open_component_in_a_cycle_leaves_itself_out() {
    let state = cyclic_store();

    let next = open_component(
        &state,
        &SchemaRef::new("default.x"),
        &TransitionContext::default(),
    )
    .unwrap();

    let uids: Vec<_> = next.working_components().keys().map(SchemaRef::as_str).collect();
    assert_eq!(uids, vec!["default.y", "default.z"]);
    assert_eq!(next.edited_component().unwrap().uid(), "default.x");
}

#[test]
fn test_edit_on_opened_component_reaching_it_through_a_cycle() {
    let state = cyclic_store().reset().with_edited_component(component_with_refs("default.x", &[]));
    let edit = AddAttribute::new(
        Target::Component,
        "default.x",
        raw(json!({ "type": "component", "name": "link", "component": "default.y" })),
    )
    .with_component_propagation(true);

    let next = add_attribute(&state, &edit, &TransitionContext::default()).unwrap();

    // y references x back; the baseline x must not shadow the edited one
    let uids: Vec<_> = next.working_components().keys().map(SchemaRef::as_str).collect();
    assert_eq!(uids, vec!["default.y", "default.z"]);
}
