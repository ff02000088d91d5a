use crate::ast::{InputSource, Value};
use crate::error::StorageError;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The simulated player the preview runs against and conditions read from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerState {
    pub chapter: u32,
    pub balances: AHashMap<String, f64>,
    /// Item id to number of copies on the merge board.
    pub board: AHashMap<String, u32>,
    pub active_features: AHashSet<String>,
    pub completed_flows: AHashSet<String>,
    /// User actions performed since the current step was entered.
    pub step_actions: AHashSet<String>,
}

impl Default for PlayerState {
    /// A fresh install: chapter one, empty wallet, empty board.
    fn default() -> Self {
        Self {
            chapter: 1,
            balances: AHashMap::new(),
            board: AHashMap::new(),
            active_features: AHashSet::new(),
            completed_flows: AHashSet::new(),
            step_actions: AHashSet::new(),
        }
    }
}

impl PlayerState {
    /// Load a player state from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads the value a condition input refers to. Missing entries read as
    /// zero or false, the same as for a fresh player.
    pub fn read(&self, source: &InputSource) -> Value {
        match source {
            InputSource::Chapter => Value::Number(self.chapter as f64),
            InputSource::Balance { currency } => Value::Number(self.balance(currency)),
            InputSource::BoardCount { item } => Value::Number(self.item_count(item) as f64),
            InputSource::FeatureActive { feature } => {
                Value::Bool(self.active_features.contains(feature))
            }
            InputSource::FlowCompleted { flow } => Value::Bool(self.completed_flows.contains(flow)),
            InputSource::UserAction { action } => Value::Bool(self.step_actions.contains(action)),
        }
    }

    pub fn balance(&self, currency: &str) -> f64 {
        self.balances.get(currency).copied().unwrap_or(0.0)
    }

    pub fn item_count(&self, item: &str) -> u32 {
        self.board.get(item).copied().unwrap_or(0)
    }

    pub fn grant(&mut self, currency: &str, amount: f64) {
        *self.balances.entry(currency.to_string()).or_insert(0.0) += amount;
    }

    pub fn add_item(&mut self, item: &str) {
        *self.board.entry(item.to_string()).or_insert(0) += 1;
    }

    /// Removes one copy; returns false when the item was not on the board.
    pub fn remove_item(&mut self, item: &str) -> bool {
        match self.board.get_mut(item) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.board.remove(item);
                true
            }
            None => false,
        }
    }

    pub fn activate_feature(&mut self, feature: &str) {
        self.active_features.insert(feature.to_string());
    }

    pub fn complete_flow(&mut self, flow: &str) {
        self.completed_flows.insert(flow.to_string());
    }

    pub fn record_action(&mut self, action: &str) {
        self.step_actions.insert(action.to_string());
    }

    pub fn clear_step_actions(&mut self) {
        self.step_actions.clear();
    }
}
