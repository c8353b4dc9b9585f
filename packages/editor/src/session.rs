//! # Edit Session Management
//!
//! An EditSession is the single writer of an editing session: it owns the
//! current store, the components created on the fly and the configuration,
//! and replaces the store with the result of each dispatched action.
//!
//! Readers take snapshots. A snapshot is a cheap clone that stays valid and
//! unchanged whatever the session does next.

use crate::actions::Action;
use crate::config::EditorConfig;
use crate::diff::{diff_working, StoreDiff};
use crate::errors::EditorResult;
use crate::resolver::TemporaryRegistry;
use crate::transition::{open_component, open_content_type, TransitionContext};
use ctb_schema::{ComponentRecord, SchemaRef, SchemaStore};
use std::sync::Arc;

pub struct EditSession {
    /// Current store
    store: SchemaStore,

    /// Components created during this session
    temporary: TemporaryRegistry,

    config: EditorConfig,

    /// Number of store replacements so far
    version: u64,
}

impl EditSession {
    /// Create new edit session
    pub fn new(store: SchemaStore, config: EditorConfig) -> Self {
        Self {
            store,
            temporary: TemporaryRegistry::new(),
            config,
            version: 0,
        }
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    /// Clone of the current store for readers
    pub fn snapshot(&self) -> SchemaStore {
        self.store.clone()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn temporary_components(&self) -> &TemporaryRegistry {
        &self.temporary
    }

    /// Make a component created on the fly resolvable by later edits
    pub fn register_temporary_component(&mut self, record: ComponentRecord) -> Arc<ComponentRecord> {
        tracing::debug!("[Session] registering temporary component {}", record.uid());
        self.temporary.register(record)
    }

    /// Apply an action and make its result the current store.
    ///
    /// On error the current store is kept as it was.
    pub fn dispatch(&mut self, action: &Action) -> EditorResult<u64> {
        let ctx = TransitionContext::new(&self.temporary, self.config.unresolved_components);

        match action.apply(&self.store, &ctx) {
            Ok(next) => {
                tracing::info!("[Session] {} applied (version {})", action.name(), self.version + 1);
                Ok(self.replace(next))
            }
            Err(err) => {
                tracing::info!("[Session] {} rejected: {}", action.name(), err);
                Err(err)
            }
        }
    }

    /// Open a baseline content type as the main document
    pub fn open_content_type(&mut self, uid: &SchemaRef) -> EditorResult<u64> {
        let ctx = TransitionContext::new(&self.temporary, self.config.unresolved_components);
        let next = open_content_type(&self.store, uid, &ctx)?;
        Ok(self.replace(next))
    }

    /// Open a component as the main document
    pub fn open_component(&mut self, uid: &SchemaRef) -> EditorResult<u64> {
        let ctx = TransitionContext::new(&self.temporary, self.config.unresolved_components);
        let next = open_component(&self.store, uid, &ctx)?;
        Ok(self.replace(next))
    }

    /// Discard the working copy and the temporary components
    pub fn reset(&mut self) -> u64 {
        self.temporary.clear();
        let next = self.store.reset();
        self.replace(next)
    }

    pub fn diff(&self) -> StoreDiff {
        diff_working(&self.store)
    }

    fn replace(&mut self, next: SchemaStore) -> u64 {
        self.store = next;
        self.version += 1;
        self.version
    }
}
