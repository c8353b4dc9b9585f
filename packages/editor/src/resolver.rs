//! # Component dependency resolution
//!
//! Computes which components must be copied into the working copy so that
//! it stays self-describing after a component reference is added.
//!
//! ## Rules
//!
//! - A component already present in the working copy is never copied again
//!   nor descended into. It may carry user edits, and the baseline version
//!   of it is irrelevant from then on.
//! - Components are looked up in the baseline first, then in the registry of
//!   components created during this session.
//! - Traversal is a work-list guarded by a visited set, so cyclic component
//!   graphs terminate with each component copied once.

use crate::errors::{EditorError, EditorResult};
use ctb_schema::{ComponentRecord, SchemaMap, SchemaRef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Somewhere a component definition can be looked up
pub trait ComponentSource {
    fn lookup(&self, uid: &SchemaRef) -> Option<Arc<ComponentRecord>>;
}

impl ComponentSource for SchemaMap<ComponentRecord> {
    fn lookup(&self, uid: &SchemaRef) -> Option<Arc<ComponentRecord>> {
        self.get(uid).cloned()
    }
}

/// Components created during the current session, not yet persisted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemporaryRegistry {
    components: SchemaMap<ComponentRecord>,
}

impl TemporaryRegistry {
    pub const fn new() -> Self {
        Self {
            components: BTreeMap::new(),
        }
    }

    /// Register a component; it is flagged temporary whatever it said before
    pub fn register(&mut self, mut record: ComponentRecord) -> Arc<ComponentRecord> {
        record.is_temporary = true;
        let record = Arc::new(record);
        self.components
            .insert(record.uid().clone(), Arc::clone(&record));
        record
    }

    pub fn remove(&mut self, uid: &str) -> Option<Arc<ComponentRecord>> {
        self.components.remove(uid)
    }

    pub fn get(&self, uid: &str) -> Option<&Arc<ComponentRecord>> {
        self.components.get(uid)
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.components.contains_key(uid)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn clear(&mut self) {
        self.components.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ComponentRecord>> {
        self.components.values()
    }
}

impl ComponentSource for TemporaryRegistry {
    fn lookup(&self, uid: &SchemaRef) -> Option<Arc<ComponentRecord>> {
        self.components.get(uid).cloned()
    }
}

/// Lookup chain, consulted in insertion order
#[derive(Default)]
pub struct ComponentSources<'a> {
    sources: Vec<&'a dyn ComponentSource>,
}

impl<'a> ComponentSources<'a> {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn chain(mut self, source: &'a dyn ComponentSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn lookup(&self, uid: &SchemaRef) -> Option<Arc<ComponentRecord>> {
        self.sources.iter().find_map(|source| source.lookup(uid))
    }
}

/// What to do with a reference no source knows about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Fail the whole transition
    #[default]
    Abort,

    /// Leave the reference dangling and keep going
    Skip,
}

/// Components to merge into the working copy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Closure {
    pub to_add: SchemaMap<ComponentRecord>,

    /// Unresolvable references left out under `UnresolvedPolicy::Skip`
    pub skipped: Vec<SchemaRef>,
}

impl Closure {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_add.len()
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.to_add.contains_key(uid)
    }
}

pub struct DependencyResolver<'a> {
    sources: ComponentSources<'a>,
    policy: UnresolvedPolicy,

    /// Uids held outside the working components that count as present
    present: HashSet<SchemaRef>,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(sources: ComponentSources<'a>, policy: UnresolvedPolicy) -> Self {
        Self {
            sources,
            policy,
            present: HashSet::new(),
        }
    }

    /// Never copy nor descend into `uid`, as if it were a working component.
    /// The component opened as the main document is one.
    pub fn with_present(mut self, uid: SchemaRef) -> Self {
        self.present.insert(uid);
        self
    }

    pub fn policy(&self) -> UnresolvedPolicy {
        self.policy
    }

    /// Closure of `root` relative to `working`
    pub fn resolve(
        &self,
        root: &SchemaRef,
        working: &SchemaMap<ComponentRecord>,
    ) -> EditorResult<Closure> {
        self.resolve_all(std::iter::once(root), working)
    }

    /// Closure of several roots (the members of a dynamic zone) in one pass
    pub fn resolve_all<'r>(
        &self,
        roots: impl IntoIterator<Item = &'r SchemaRef>,
        working: &SchemaMap<ComponentRecord>,
    ) -> EditorResult<Closure> {
        let mut closure = Closure::default();
        let mut visited: HashSet<SchemaRef> = self.present.clone();
        let mut pending: Vec<SchemaRef> = roots.into_iter().cloned().collect();

        while let Some(uid) = pending.pop() {
            if working.contains_key(&uid) || !visited.insert(uid.clone()) {
                continue;
            }

            let Some(record) = self.sources.lookup(&uid) else {
                match self.policy {
                    UnresolvedPolicy::Abort => {
                        return Err(EditorError::UnresolvedComponentReference { uid });
                    }
                    UnresolvedPolicy::Skip => {
                        tracing::warn!("[Resolver] Skipping unresolved component {}", uid);
                        closure.skipped.push(uid);
                        continue;
                    }
                }
            };

            for nested in record.component_refs() {
                if !visited.contains(nested) && !working.contains_key(nested) {
                    pending.push(nested.clone());
                }
            }

            tracing::debug!("[Resolver] Adding component {}", uid);
            closure.to_add.insert(uid, record);
        }

        Ok(closure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctb_schema::{AttributeDef, SchemaDoc, Settings};
    use serde_json::json;

    fn reference(component: &str) -> AttributeDef {
        let settings: Settings = serde_json::from_value(json!({ "component": component })).unwrap();
        AttributeDef::from_fields("component", settings).unwrap()
    }

    fn record(uid: &str, refs: &[&str]) -> ComponentRecord {
        let mut doc = SchemaDoc::new(uid, uid).with_category("default");
        for (i, target) in refs.iter().enumerate() {
            doc.set_attribute(format!("field_{}", i), reference(target));
        }
        ComponentRecord::new(doc)
    }

    fn map(records: Vec<ComponentRecord>) -> SchemaMap<ComponentRecord> {
        records
            .into_iter()
            .map(|r| (r.uid().clone(), Arc::new(r)))
            .collect()
    }

    #[test]
    fn test_resolves_nested_components() {
        let baseline = map(vec![
            record("default.closingperiod", &["default.dish"]),
            record("default.dish", &[]),
        ]);
        let resolver =
            DependencyResolver::new(ComponentSources::new().chain(&baseline), UnresolvedPolicy::Abort);

        let closure = resolver
            .resolve(&SchemaRef::new("default.closingperiod"), &SchemaMap::new())
            .unwrap();

        assert_eq!(closure.len(), 2);
        assert!(closure.contains("default.closingperiod"));
        assert!(closure.contains("default.dish"));
        assert!(Arc::ptr_eq(
            &closure.to_add["default.dish"],
            &baseline["default.dish"]
        ));
    }

    #[test]
    fn test_present_working_component_is_not_descended() {
        let baseline = map(vec![
            record("default.a", &["default.b"]),
            record("default.b", &["default.c"]),
            record("default.c", &[]),
        ]);
        // The working copy of b no longer references c
        let working = map(vec![record("default.b", &[])]);
        let resolver =
            DependencyResolver::new(ComponentSources::new().chain(&baseline), UnresolvedPolicy::Abort);

        let closure = resolver.resolve(&SchemaRef::new("default.a"), &working).unwrap();

        assert_eq!(closure.len(), 1);
        assert!(closure.contains("default.a"));
    }

    #[test]
    fn test_root_already_working_yields_nothing() {
        let baseline = map(vec![record("default.dish", &[])]);
        let working = map(vec![record("default.dish", &[])]);
        let resolver =
            DependencyResolver::new(ComponentSources::new().chain(&baseline), UnresolvedPolicy::Abort);

        let closure = resolver.resolve(&SchemaRef::new("default.dish"), &working).unwrap();
        assert!(closure.is_empty());
    }

    #[test]
    fn test_present_uid_is_neither_copied_nor_descended() {
        let baseline = map(vec![
            record("default.x", &["default.y"]),
            record("default.y", &["default.x", "default.z"]),
            record("default.z", &[]),
        ]);
        let resolver =
            DependencyResolver::new(ComponentSources::new().chain(&baseline), UnresolvedPolicy::Abort)
                .with_present(SchemaRef::new("default.x"));

        let closure = resolver.resolve(&SchemaRef::new("default.y"), &SchemaMap::new()).unwrap();

        let uids: Vec<_> = closure.to_add.keys().map(SchemaRef::as_str).collect();
        assert_eq!(uids, vec!["default.y", "default.z"]);
    }

    #[test]
    fn test_cycles_terminate() {
        let baseline = map(vec![
            record("default.x", &["default.y"]),
            record("default.y", &["default.x", "default.y"]),
        ]);
        let resolver =
            DependencyResolver::new(ComponentSources::new().chain(&baseline), UnresolvedPolicy::Abort);

        let closure = resolver.resolve(&SchemaRef::new("default.x"), &SchemaMap::new()).unwrap();

        assert_eq!(closure.len(), 2);
        assert!(closure.contains("default.x"));
        assert!(closure.contains("default.y"));
    }

    #[test]
    fn test_temporary_registry_is_consulted_after_baseline() {
        let baseline = map(vec![record("default.dish", &["default.new-compo"])]);
        let mut temporary = TemporaryRegistry::new();
        temporary.register(record("default.new-compo", &[]));
        let resolver = DependencyResolver::new(
            ComponentSources::new().chain(&baseline).chain(&temporary),
            UnresolvedPolicy::Abort,
        );

        let closure = resolver.resolve(&SchemaRef::new("default.dish"), &SchemaMap::new()).unwrap();

        assert_eq!(closure.len(), 2);
        assert!(closure.to_add["default.new-compo"].is_temporary);
    }

    #[test]
    fn test_unresolved_reference_aborts() {
        let baseline = map(vec![record("default.a", &["default.missing"])]);
        let resolver =
            DependencyResolver::new(ComponentSources::new().chain(&baseline), UnresolvedPolicy::Abort);

        let err = resolver
            .resolve(&SchemaRef::new("default.a"), &SchemaMap::new())
            .unwrap_err();

        match err {
            EditorError::UnresolvedComponentReference { uid } => assert_eq!(uid, "default.missing"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_reference_skipped() {
        let baseline = map(vec![record("default.a", &["default.missing"])]);
        let resolver =
            DependencyResolver::new(ComponentSources::new().chain(&baseline), UnresolvedPolicy::Skip);

        let closure = resolver.resolve(&SchemaRef::new("default.a"), &SchemaMap::new()).unwrap();

        assert_eq!(closure.len(), 1);
        assert_eq!(closure.skipped, vec![SchemaRef::new("default.missing")]);
    }

    #[test]
    fn test_resolve_all_shares_visited_set() {
        let baseline = map(vec![
            record("blog.quote", &["default.dish"]),
            record("blog.image", &["default.dish"]),
            record("default.dish", &[]),
        ]);
        let resolver =
            DependencyResolver::new(ComponentSources::new().chain(&baseline), UnresolvedPolicy::Abort);
        let roots = vec![SchemaRef::new("blog.quote"), SchemaRef::new("blog.image")];

        let closure = resolver.resolve_all(&roots, &SchemaMap::new()).unwrap();
        assert_eq!(closure.len(), 3);
    }

    #[test]
    fn test_registry_forces_temporary_flag() {
        let mut temporary = TemporaryRegistry::new();
        let registered = temporary.register(record("default.new-compo", &[]));

        assert!(registered.is_temporary);
        assert!(temporary.contains("default.new-compo"));
        assert_eq!(temporary.len(), 1);
        assert!(temporary.remove("default.new-compo").is_some());
        assert!(temporary.is_empty());
    }
}
