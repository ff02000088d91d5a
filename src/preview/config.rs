use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tuning for a preview run. Every field has a default, so a config file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewConfig {
    /// How long a step without completion conditions stays on screen
    /// after its actions ran.
    pub auto_advance_ms: u64,
    /// Upper bound on step entries per run.
    pub max_visits: usize,
    /// Skip steps whose entry conditions do not hold. When false, entry
    /// conditions are ignored and every step is shown.
    pub skip_unmet_entry: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            auto_advance_ms: 1000,
            max_visits: 256,
            skip_unmet_entry: true,
        }
    }
}

impl PreviewConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}
