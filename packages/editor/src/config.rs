use crate::errors::{EditorError, EditorResult};
use crate::resolver::UnresolvedPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "ctb.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// What a transition does with a component reference nobody knows
    #[serde(default)]
    pub unresolved_components: UnresolvedPolicy,
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults
    pub fn load(dir: &Path) -> EditorResult<Self> {
        let config_path = dir.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> EditorResult<Self> {
        serde_json::from_str(content).map_err(|e| EditorError::Config(e.to_string()))
    }
}
