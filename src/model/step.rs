use super::action::Action;
use super::condition::Condition;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category tag of a step; drives the canvas colour in the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "lowercase")]
pub enum StepCategory {
    #[default]
    Ui,
    Game,
    Analytics,
    Flow,
}

impl fmt::Display for StepCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepCategory::Ui => "ui",
            StepCategory::Game => "game",
            StepCategory::Analytics => "analytics",
            StepCategory::Flow => "flow",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum ContextType {
    Chapter,
    Scene,
    Item,
    Feature,
    ScapeTask,
}

/// Where in the game a step takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "camelCase")]
pub struct StepContext {
    pub context_type: ContextType,
    pub context_value: String,
}

/// One unit of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub legacy: u32,
    #[serde(rename = "type", default)]
    pub category: StepCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<StepContext>,
    /// Applied in order when the step is entered.
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Applied in order when the step completes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exit_actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry_conditions: Vec<Condition>,
    #[serde(default)]
    pub completion_conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step: Option<String>,
}

impl Step {
    pub fn new(id: &str, name: &str, category: StepCategory) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            legacy: 0,
            category,
            context: None,
            actions: Vec::new(),
            exit_actions: Vec::new(),
            entry_conditions: Vec::new(),
            completion_conditions: Vec::new(),
            next_step: None,
        }
    }

    pub fn with_legacy(mut self, legacy: u32) -> Self {
        self.legacy = legacy;
        self
    }

    pub fn with_context(mut self, context_type: ContextType, value: &str) -> Self {
        self.context = Some(StepContext {
            context_type,
            context_value: value.to_string(),
        });
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_exit_action(mut self, action: Action) -> Self {
        self.exit_actions.push(action);
        self
    }

    pub fn with_entry_condition(mut self, condition: Condition) -> Self {
        self.entry_conditions.push(condition);
        self
    }

    pub fn with_completion(mut self, condition: Condition) -> Self {
        self.completion_conditions.push(condition);
        self
    }

    pub fn with_next(mut self, next: &str) -> Self {
        self.next_step = Some(next.to_string());
        self
    }

    /// Short action list as shown on a canvas node: the first `limit`
    /// labels, then `+N` for the rest.
    pub fn action_summary(&self, limit: usize) -> String {
        let mut parts: Vec<String> = self
            .actions
            .iter()
            .take(limit)
            .map(Action::label)
            .collect();
        if self.actions.len() > limit {
            parts.push(format!("+{}", self.actions.len() - limit));
        }
        parts.join(", ")
    }
}
