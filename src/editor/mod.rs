//! Editing operations on a single flow: the step canvas, the properties
//! panel and the action / condition builders, expressed as list operations.
//!
//! Every successful mutation calls [`Flow::touch`], so the stored step count
//! and the modification label stay in sync with the step list.

use crate::error::EditError;
use crate::model::{Action, Condition, Flow, Step};

mod templates;

pub use templates::StepTemplate;

/// Which action list of a step an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionList {
    Enter,
    Exit,
}

/// Which condition list of a step an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionList {
    Entry,
    Completion,
}

fn check_index(index: usize, len: usize) -> Result<(), EditError> {
    if index < len {
        Ok(())
    } else {
        Err(EditError::IndexOutOfBounds { index, len })
    }
}

/// Moves the element at `from` so that it ends up at `to`, shifting the
/// elements in between. This is the drag-reorder primitive.
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), EditError> {
    check_index(from, items.len())?;
    check_index(to, items.len())?;
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

impl Flow {
    pub fn step(&self, step_id: &str) -> Result<&Step, EditError> {
        self.steps
            .iter()
            .find(|s| s.id == step_id)
            .ok_or_else(|| self.step_not_found(step_id))
    }

    pub fn step_mut(&mut self, step_id: &str) -> Result<&mut Step, EditError> {
        let flow_id = self.id.clone();
        self.steps
            .iter_mut()
            .find(|s| s.id == step_id)
            .ok_or_else(|| EditError::StepNotFound {
                flow_id,
                step_id: step_id.to_string(),
            })
    }

    fn step_not_found(&self, step_id: &str) -> EditError {
        EditError::StepNotFound {
            flow_id: self.id.clone(),
            step_id: step_id.to_string(),
        }
    }

    /// One past the highest legacy step number in the flow.
    pub fn next_legacy_step_number(&self) -> Result<u32, EditError> {
        match self.steps.iter().map(|s| s.legacy).max() {
            Some(highest) => highest
                .checked_add(1)
                .ok_or(EditError::LegacyNumberExhausted(highest)),
            None => Ok(0),
        }
    }

    /// Appends a step at the end of the flow.
    pub fn add_step(&mut self, step: Step) -> Result<(), EditError> {
        let len = self.steps.len();
        self.insert_step(len, step)
    }

    /// Inserts a step at `index` (`index == len` appends).
    pub fn insert_step(&mut self, index: usize, step: Step) -> Result<(), EditError> {
        if self.steps.iter().any(|s| s.id == step.id) {
            return Err(EditError::DuplicateStepId(step.id));
        }
        if index > self.steps.len() {
            return Err(EditError::IndexOutOfBounds {
                index,
                len: self.steps.len(),
            });
        }
        log::debug!("Flow '{}': inserting step '{}' at {}", self.id, step.id, index);
        self.steps.insert(index, step);
        self.touch();
        Ok(())
    }

    /// Removes a step and clears every next-step link that pointed at it.
    pub fn remove_step(&mut self, step_id: &str) -> Result<Step, EditError> {
        let index = self
            .step_index(step_id)
            .ok_or_else(|| self.step_not_found(step_id))?;
        let removed = self.steps.remove(index);
        for step in &mut self.steps {
            if step.next_step.as_deref() == Some(step_id) {
                step.next_step = None;
            }
        }
        self.touch();
        Ok(removed)
    }

    /// Drag-reorders a step from position `from` to position `to`.
    pub fn move_step(&mut self, from: usize, to: usize) -> Result<(), EditError> {
        move_item(&mut self.steps, from, to)?;
        self.touch();
        Ok(())
    }

    /// Links `step_id` to `next`; `None` means the flow ends after it
    /// (or continues in list order when it is not the last step).
    pub fn set_next_step(&mut self, step_id: &str, next: Option<&str>) -> Result<(), EditError> {
        if let Some(next) = next {
            if self.step_index(next).is_none() {
                return Err(self.step_not_found(next));
            }
        }
        self.step_mut(step_id)?.next_step = next.map(str::to_string);
        self.touch();
        Ok(())
    }

    fn actions_mut(&mut self, step_id: &str, list: ActionList) -> Result<&mut Vec<Action>, EditError> {
        let step = self.step_mut(step_id)?;
        Ok(match list {
            ActionList::Enter => &mut step.actions,
            ActionList::Exit => &mut step.exit_actions,
        })
    }

    pub fn add_action(&mut self, step_id: &str, list: ActionList, action: Action) -> Result<(), EditError> {
        self.actions_mut(step_id, list)?.push(action);
        self.touch();
        Ok(())
    }

    pub fn remove_action(
        &mut self,
        step_id: &str,
        list: ActionList,
        index: usize,
    ) -> Result<Action, EditError> {
        let actions = self.actions_mut(step_id, list)?;
        check_index(index, actions.len())?;
        let removed = actions.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn replace_action(
        &mut self,
        step_id: &str,
        list: ActionList,
        index: usize,
        action: Action,
    ) -> Result<Action, EditError> {
        let actions = self.actions_mut(step_id, list)?;
        check_index(index, actions.len())?;
        let previous = std::mem::replace(&mut actions[index], action);
        self.touch();
        Ok(previous)
    }

    pub fn move_action(
        &mut self,
        step_id: &str,
        list: ActionList,
        from: usize,
        to: usize,
    ) -> Result<(), EditError> {
        move_item(self.actions_mut(step_id, list)?, from, to)?;
        self.touch();
        Ok(())
    }

    fn conditions_mut(
        &mut self,
        step_id: &str,
        list: ConditionList,
    ) -> Result<&mut Vec<Condition>, EditError> {
        let step = self.step_mut(step_id)?;
        Ok(match list {
            ConditionList::Entry => &mut step.entry_conditions,
            ConditionList::Completion => &mut step.completion_conditions,
        })
    }

    pub fn add_condition(
        &mut self,
        step_id: &str,
        list: ConditionList,
        condition: Condition,
    ) -> Result<(), EditError> {
        self.conditions_mut(step_id, list)?.push(condition);
        self.touch();
        Ok(())
    }

    pub fn remove_condition(
        &mut self,
        step_id: &str,
        list: ConditionList,
        index: usize,
    ) -> Result<Condition, EditError> {
        let conditions = self.conditions_mut(step_id, list)?;
        check_index(index, conditions.len())?;
        let removed = conditions.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Appends a step built from a library template.
    pub fn add_step_from_template(
        &mut self,
        template: StepTemplate,
        id: &str,
        name: &str,
    ) -> Result<(), EditError> {
        let legacy = self.next_legacy_step_number()?;
        self.add_step(template.build(id, name, legacy))
    }
}
