//! Common test utilities for building flows, libraries and players.
use ftue::prelude::*;
use std::path::PathBuf;

/// Creates a three-step flow covering dialogs, input locks and delays.
///
/// `welcome` (click) -> `tap_board` (tap on the board button) -> `reward`
/// (no completion conditions, auto-advances).
#[allow(dead_code)]
pub fn create_simple_flow() -> Flow {
    let mut flow = Flow::new("first_steps", "First Steps");
    flow.legacy = 1;
    flow.add_step(
        Step::new("welcome", "Welcome", StepCategory::Ui)
            .with_legacy(0)
            .with_action(Action::show_dialog("dlg_welcome", Character::Chris))
            .with_completion(Condition::user_action("click")),
    )
    .unwrap();
    flow.add_step(
        Step::new("tap_board", "Tap the Board", StepCategory::Ui)
            .with_legacy(1)
            .with_action(Action::new(ActionKind::LockAllInput))
            .with_action(Action::highlight(Target::BoardButton))
            .with_action(Action::show_finger(Target::BoardButton))
            .with_exit_action(Action::new(ActionKind::HideFinger))
            .with_exit_action(Action::new(ActionKind::UnlockAllInput))
            .with_completion(Condition::user_action("tap")),
    )
    .unwrap();
    flow.add_step(
        Step::new("reward", "Reward", StepCategory::Game)
            .with_legacy(2)
            .with_action(Action::on(
                ActionKind::GrantCurrency {
                    currency: "coins".to_string(),
                    amount: 100.0,
                },
                Target::Currency,
            ))
            .with_action(Action::delay(500))
            .with_action(Action::analytics("ftue_reward")),
    )
    .unwrap();
    flow
}

/// A step that waits for a click, for building small flows by hand.
#[allow(dead_code)]
pub fn click_step(id: &str) -> Step {
    Step::new(id, id, StepCategory::Ui)
        .with_action(Action::analytics(&format!("ftue_{}", id)))
        .with_completion(Condition::user_action("click"))
}

/// Builds a flow from steps without going through the editor checks.
#[allow(dead_code)]
pub fn flow_of(id: &str, steps: Vec<Step>) -> Flow {
    let mut flow = Flow::new(id, id);
    flow.steps = steps;
    flow.touch();
    flow
}

/// A summary-only flow as listed on the dashboard.
#[allow(dead_code)]
pub fn summary_flow(
    id: &str,
    name: &str,
    legacy: u32,
    steps: u32,
    status: FlowStatus,
    priority: i32,
) -> Flow {
    let mut flow = Flow::new(id, name);
    flow.legacy = legacy;
    flow.step_count = steps;
    flow.status = status;
    flow.priority = priority;
    flow.modified = "1 day ago".to_string();
    flow
}

/// The dashboard's flow list.
#[allow(dead_code)]
pub fn create_sample_library() -> FlowLibrary {
    FlowLibrary::from_flows(vec![
        summary_flow("onboarding_core_loop", "Core Loop Introduction", 1, 14, FlowStatus::Active, 100),
        summary_flow("second_scapes_task", "Second Scapes Task", 2, 21, FlowStatus::Active, 95),
        summary_flow("first_chapter_complete", "First Chapter Completion", 3, 12, FlowStatus::Active, 90),
        summary_flow("flowers_intro", "Flowers Feature Intro", 13, 4, FlowStatus::Active, 50),
        summary_flow("recipes_intro", "Recipes Feature Intro", 14, 7, FlowStatus::Draft, 50),
        summary_flow("mode_2_unlock", "Mode 2 Unlock", 10, 7, FlowStatus::Inactive, 40),
    ])
}

#[allow(dead_code)]
pub fn player_at_chapter(chapter: u32) -> PlayerState {
    PlayerState {
        chapter,
        ..PlayerState::default()
    }
}

/// Path of a file shipped in the crate's `data/` directory.
#[allow(dead_code)]
pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

/// A scratch file path unique to one test.
#[allow(dead_code)]
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ftue_{}_{}", std::process::id(), name))
}
