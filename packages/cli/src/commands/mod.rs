pub mod apply;
pub mod closure;
pub mod diff;

pub use apply::{apply, ApplyArgs};
pub use closure::{closure, ClosureArgs};
pub use diff::{diff, DiffArgs};

use anyhow::{Context, Result};
use ctb_editor::{ComponentRecord, EditorConfig, SchemaStore};
use std::fs;
use std::path::{Path, PathBuf};

/// Read a store snapshot from a JSON file
pub(crate) fn read_store(path: &Path) -> Result<SchemaStore> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid store in {}", path.display()))
}

/// Read a JSON array of component records created outside the baseline
pub(crate) fn read_components(path: &Path) -> Result<Vec<ComponentRecord>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid component list in {}", path.display()))
}

/// Load `ctb.config.json` from `dir`, or from the working directory
pub(crate) fn load_config(dir: Option<&PathBuf>, cwd: &Path) -> Result<EditorConfig> {
    let dir = dir.map(PathBuf::as_path).unwrap_or(cwd);
    Ok(EditorConfig::load(dir)?)
}
