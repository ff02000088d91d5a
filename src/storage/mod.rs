//! Reading and writing flows.
//!
//! The editable library is stored as pretty-printed JSON, the same shape the
//! JSON inspector shows. Published bundles use bincode, see [`PublishedFlow`].

mod artifact;

pub use artifact::{PublishedFlow, PublishedStep};

use crate::error::StorageError;
use crate::library::FlowLibrary;
use crate::model::Flow;
use std::fs;
use std::path::Path;

impl FlowLibrary {
    /// Loads a library from a JSON array of flows.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let library: FlowLibrary = serde_json::from_str(&content)?;
        log::info!("Loaded {} flow(s) from '{}'", library.len(), path.display());
        Ok(library)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Saved {} flow(s) to '{}'", self.len(), path.display());
        Ok(())
    }
}

/// Renders one flow as the JSON inspector shows it.
pub fn export_flow_json(flow: &Flow) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(flow)?)
}

/// Parses a flow pasted into the JSON inspector. The stored step count is
/// re-synced when the flow embeds its steps.
pub fn import_flow_json(json: &str) -> Result<Flow, StorageError> {
    let mut flow: Flow = serde_json::from_str(json)?;
    if !flow.steps.is_empty() {
        flow.step_count = flow.steps.len() as u32;
    }
    Ok(flow)
}
