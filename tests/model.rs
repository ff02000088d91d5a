//! Tests for the flow data model and its JSON shape.
mod common;
use common::*;
use ftue::model::{ActionCategory, BoardPosition, ContextType};
use ftue::prelude::*;
use serde_json::json;

#[test]
fn test_action_json_uses_type_tag_and_target() {
    let action = Action::show_dialog("dlg_intro", Character::Kara);
    let value = serde_json::to_value(&action).unwrap();
    assert_eq!(
        value,
        json!({
            "Type": "ShowDialog",
            "dialogId": "dlg_intro",
            "character": "kara",
            "blockInput": true,
            "Target": "None"
        })
    );
}

#[test]
fn test_action_json_defaults() {
    let action: Action =
        serde_json::from_value(json!({ "Type": "ShowDialog", "dialogId": "dlg_x" })).unwrap();
    assert_eq!(action.target, Target::None);
    assert_eq!(
        action.kind,
        ActionKind::ShowDialog {
            dialog_id: "dlg_x".to_string(),
            character: Character::Chris,
            block_input: true,
        }
    );

    let shade: Action = serde_json::from_value(json!({ "Type": "ShadeScreen" })).unwrap();
    assert_eq!(shade.kind, ActionKind::ShadeScreen { opacity: 0.7 });
}

#[test]
fn test_action_json_targets() {
    let highlight: Action =
        serde_json::from_value(json!({ "Type": "HighlightElement", "Target": "BoardButton" }))
            .unwrap();
    assert_eq!(highlight, Action::highlight(Target::BoardButton));

    let custom: Action = serde_json::from_value(
        json!({ "Type": "HighlightElement", "Target": "btn_settings" }),
    )
    .unwrap();
    assert_eq!(custom.target, Target::Element("btn_settings".to_string()));

    // Named and custom targets are both written as plain names.
    let json = serde_json::to_value(&custom).unwrap();
    assert_eq!(json["Target"], json!("btn_settings"));
    let json = serde_json::to_value(Action::new(ActionKind::HideFinger)).unwrap();
    assert_eq!(json["Target"], json!("None"));
}

#[test]
fn test_action_json_payloads() {
    let add: Action = serde_json::from_value(json!({
        "Type": "AddItemOnBoard",
        "itemId": "wrench_1",
        "position": { "x": 2, "y": 3 },
        "Target": "MergeBoard"
    }))
    .unwrap();
    assert_eq!(
        add.kind,
        ActionKind::AddItemOnBoard {
            item_id: "wrench_1".to_string(),
            position: Some(BoardPosition { x: 2, y: 3 }),
        }
    );

    let grant: Action = serde_json::from_value(json!({
        "Type": "GrantCurrency", "currency": "gems", "amount": 5
    }))
    .unwrap();
    assert_eq!(
        grant.kind,
        ActionKind::GrantCurrency {
            currency: "gems".to_string(),
            amount: 5.0,
        }
    );
}

#[test]
fn test_unknown_action_type_is_rejected() {
    let result: serde_json::Result<Action> = serde_json::from_value(json!({ "Type": "Explode" }));
    assert!(result.is_err());
}

#[test]
fn test_action_names_cover_every_kind() {
    for name in ActionKind::NAMES {
        let kind = ActionKind::from_name(name).unwrap();
        assert_eq!(kind.name(), name);
    }
    assert!(ActionKind::from_name("highlight_ui").is_none());

    let total: usize = ActionCategory::ALL.iter().map(|c| c.kinds().len()).sum();
    assert_eq!(total, ActionKind::NAMES.len());
    assert_eq!(
        ActionCategory::Flow.kinds(),
        vec!["delay", "start_flow", "complete_flow"]
    );
    assert_eq!(ActionCategory::Analytics.kinds(), vec!["send_analytics"]);
}

#[test]
fn test_action_label() {
    assert_eq!(Action::new(ActionKind::LockAllInput).label(), "lock all input");
}

#[test]
fn test_condition_json() {
    let condition: Condition = serde_json::from_value(json!({
        "type": "balance", "operator": ">=", "value": 100, "key": "coins"
    }))
    .unwrap();
    assert_eq!(
        condition,
        Condition::balance("coins", Operator::GreaterOrEqual, 100.0)
    );

    let flag: Condition =
        serde_json::from_value(json!({ "type": "user_action", "value": "click" })).unwrap();
    assert_eq!(flag, Condition::user_action("click"));
    assert_eq!(flag.effective_operator(), Operator::Equal);

    let value = serde_json::to_value(Condition::chapter(Operator::Equal, 1)).unwrap();
    assert_eq!(value, json!({ "type": "chapter", "operator": "==", "value": 1.0 }));
}

#[test]
fn test_condition_display() {
    assert_eq!(Condition::chapter(Operator::Equal, 1).to_string(), "chapter == 1");
    assert_eq!(
        Condition::balance("coins", Operator::GreaterOrEqual, 100.0).to_string(),
        "balance.coins >= 100"
    );
    assert_eq!(Condition::user_action("click").to_string(), "user_action: click");

    let mut absent = Condition::item_on_board("wrench_2");
    absent.operator = Some(Operator::NotEqual);
    assert_eq!(absent.to_string(), "item_on_board: not wrench_2");
}

#[test]
fn test_step_json_shape() {
    let step = Step::new("intro", "Intro", StepCategory::Ui)
        .with_context(ContextType::Chapter, "1")
        .with_action(Action::analytics("ftue_intro"))
        .with_completion(Condition::user_action("click"));
    let value = serde_json::to_value(&step).unwrap();

    assert_eq!(value["type"], "ui");
    assert_eq!(value["context"], json!({ "contextType": "chapter", "contextValue": "1" }));
    assert!(value.get("completionConditions").is_some());
    assert!(value.get("exitActions").is_none());
    assert!(value.get("nextStep").is_none());
}

#[test]
fn test_step_action_summary() {
    let step = Step::new("hl", "Highlight", StepCategory::Ui)
        .with_action(Action::new(ActionKind::ShadeScreen { opacity: 0.7 }))
        .with_action(Action::new(ActionKind::LockAllInput))
        .with_action(Action::highlight(Target::BoardButton))
        .with_action(Action::show_finger(Target::BoardButton));
    assert_eq!(step.action_summary(2), "shade screen, lock all input, +2");
    assert_eq!(step.action_summary(10).matches(", ").count(), 3);
}

#[test]
fn test_flow_summary_json() {
    let flow: Flow = serde_json::from_value(json!({
        "id": "mode_2_unlock",
        "name": "Mode 2 Unlock",
        "legacy": 10,
        "stepCount": 7,
        "status": "inactive",
        "priority": 40,
        "modified": "2 weeks ago"
    }))
    .unwrap();
    assert_eq!(flow.status, FlowStatus::Inactive);
    assert_eq!(flow.step_count(), 7);
    assert!(flow.steps.is_empty());

    let value = serde_json::to_value(&flow).unwrap();
    assert!(value.get("steps").is_none());
    assert_eq!(value["stepCount"], 7);
}

#[test]
fn test_flow_next_index() {
    let mut flow = create_simple_flow();
    assert_eq!(flow.next_index(0), Some(1));
    assert_eq!(flow.next_index(2), None);

    flow.steps[0].next_step = Some("reward".to_string());
    assert_eq!(flow.next_index(0), Some(2));

    flow.steps[0].next_step = Some("missing".to_string());
    assert_eq!(flow.next_index(0), None);
}
