//! # Content-Type Builder editor core
//!
//! State transitions of the schema editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI: dispatches actions, renders working copy│
//! └─────────────────────────────────────────────┘
//!                     ↓ Action
//! ┌─────────────────────────────────────────────┐
//! │ editor: pure transitions                    │
//! │  - normalize the dispatched attribute       │
//! │  - write it into the working schema         │
//! │  - resolve component dependency closures    │
//! └─────────────────────────────────────────────┘
//!                     ↓ SchemaStore
//! ┌─────────────────────────────────────────────┐
//! │ persistence: diff working copy vs baseline  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Stores are values**: a transition returns a new store and leaves the
//!    old one valid; untouched documents are shared by pointer
//! 2. **User edits win**: a component already in the working copy is never
//!    replaced by its baseline version
//! 3. **Closed working copy**: every component the working copy references
//!    is in the working copy
//! 4. **All or nothing**: a failing transition produces no store at all
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ctb_editor::{Action, AddAttribute, EditSession, EditorConfig, Target};
//!
//! let mut session = EditSession::new(store, EditorConfig::default());
//! session.open_content_type(&"application::address.address".into())?;
//!
//! let edit = AddAttribute::new(Target::ContentType, "application::address.address", raw)
//!     .with_component_propagation(true);
//! session.dispatch(&Action::from(edit))?;
//!
//! let diff = session.diff();
//! ```

mod actions;
mod config;
mod diff;
mod errors;
mod normalizer;
mod resolver;
mod session;
mod transition;

pub use actions::Action;
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use diff::{diff_working, StoreDiff};
pub use errors::{EditorError, EditorResult};
pub use normalizer::{normalize, RawAttribute, NAME_KEY};
pub use resolver::{
    Closure, ComponentSource, ComponentSources, DependencyResolver, TemporaryRegistry,
    UnresolvedPolicy,
};
pub use session::EditSession;
pub use transition::{
    add_attribute, open_component, open_content_type, AddAttribute, Target, TransitionContext,
};

// Re-export the schema model for convenience
pub use ctb_schema::{
    AttributeDef, ComponentRecord, SchemaDoc, SchemaMap, SchemaRef, SchemaStore,
};
