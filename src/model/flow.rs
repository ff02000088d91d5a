use super::step::Step;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label written to `Flow::modified` by every edit.
pub const JUST_NOW: &str = "Just now";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    #[default]
    Draft,
    Active,
    Inactive,
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowStatus::Draft => "draft",
            FlowStatus::Active => "active",
            FlowStatus::Inactive => "inactive",
        };
        f.write_str(name)
    }
}

/// A named, ordered tutorial sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub legacy: u32,
    #[serde(default)]
    pub step_count: u32,
    #[serde(default)]
    pub status: FlowStatus,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub modified: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
}

impl Flow {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            legacy: 0,
            step_count: 0,
            status: FlowStatus::Draft,
            priority: 50,
            modified: JUST_NOW.to_string(),
            steps: Vec::new(),
        }
    }

    /// Number of steps; the embedded list wins over the stored count.
    pub fn step_count(&self) -> u32 {
        if self.steps.is_empty() {
            self.step_count
        } else {
            self.steps.len() as u32
        }
    }

    pub fn step_index(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }

    /// Index of the step that follows `index`: its `next_step` link when set,
    /// otherwise the next step in list order. `None` ends the flow, which is
    /// also what a link to a missing step does.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let step = self.steps.get(index)?;
        match &step.next_step {
            Some(next) => self.step_index(next),
            None if index + 1 < self.steps.len() => Some(index + 1),
            None => None,
        }
    }

    /// Re-syncs the stored count and stamps the modification label.
    pub fn touch(&mut self) {
        self.step_count = self.steps.len() as u32;
        self.modified = JUST_NOW.to_string();
    }
}
