use crate::model::{Action, ActionKind, Character, Condition, Step, StepCategory, Target};

/// Preset steps offered in the editor's step library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTemplate {
    /// Character dialog, dismissed with a click.
    Dialog,
    /// Shade, highlight and point at one element; completes on its tap.
    Highlight,
    /// Locks nothing and waits for a named user action.
    WaitForAction,
    /// Fires an analytics event and moves on.
    AnalyticsOnly,
}

impl StepTemplate {
    pub const ALL: [StepTemplate; 4] = [
        StepTemplate::Dialog,
        StepTemplate::Highlight,
        StepTemplate::WaitForAction,
        StepTemplate::AnalyticsOnly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StepTemplate::Dialog => "Dialog Step",
            StepTemplate::Highlight => "Highlight Step",
            StepTemplate::WaitForAction => "Wait for Action",
            StepTemplate::AnalyticsOnly => "Analytics Only",
        }
    }

    pub fn build(&self, id: &str, name: &str, legacy: u32) -> Step {
        let step = match self {
            StepTemplate::Dialog => Step::new(id, name, StepCategory::Ui)
                .with_action(Action::show_dialog(&format!("ftue_{}", id), Character::Chris))
                .with_exit_action(Action::new(ActionKind::HideDialog))
                .with_completion(Condition::user_action("click")),
            StepTemplate::Highlight => Step::new(id, name, StepCategory::Ui)
                .with_action(Action::new(ActionKind::ShadeScreen { opacity: 0.7 }))
                .with_action(Action::new(ActionKind::LockAllInput))
                .with_action(Action::highlight(Target::BoardButton))
                .with_action(Action::show_finger(Target::BoardButton))
                .with_exit_action(Action::new(ActionKind::HideFinger))
                .with_exit_action(Action::on(ActionKind::RemoveHighlight, Target::BoardButton))
                .with_exit_action(Action::new(ActionKind::UnlockAllInput))
                .with_exit_action(Action::new(ActionKind::UnshadeScreen))
                .with_completion(Condition::user_action("tap")),
            StepTemplate::WaitForAction => Step::new(id, name, StepCategory::Game)
                .with_completion(Condition::user_action("merge")),
            StepTemplate::AnalyticsOnly => Step::new(id, name, StepCategory::Analytics)
                .with_action(Action::analytics(&format!("ftue_{}", id))),
        };
        step.with_legacy(legacy)
    }
}
