//! Tests for flow validation.
mod common;
use common::*;
use ftue::model::ConditionValue;
use ftue::prelude::*;

fn messages(report: &ValidationReport, severity: Severity) -> Vec<String> {
    report
        .issues
        .iter()
        .filter(|i| i.severity == severity)
        .map(|i| i.to_string())
        .collect()
}

#[test]
fn test_valid_flow_has_no_issues() {
    let report = validate(&create_simple_flow());
    assert!(report.is_valid());
    assert!(report.issues.is_empty(), "{:?}", report.issues);
}

#[test]
fn test_flow_level_problems() {
    let mut flow = Flow::new("", " ");
    flow.priority = 150;
    let report = validate(&flow);

    assert_eq!(
        messages(&report, Severity::Error),
        vec![
            "[error] Flow id is empty",
            "[error] Flow name is empty",
            "[error] Flow has no steps",
        ]
    );
    assert_eq!(report.warning_count(), 1);
}

#[test]
fn test_duplicate_ids_and_legacy_numbers() {
    let flow = flow_of("dupes", vec![click_step("a"), click_step("a"), click_step("b")]);
    let report = validate(&flow);

    assert!(!report.is_valid());
    assert!(messages(&report, Severity::Error)
        .contains(&"[error] step 'a': Step id is used more than once".to_string()));
    assert!(messages(&report, Severity::Warning)
        .contains(&"[warning] Legacy step number 0 is shared by: a, a, b".to_string()));
}

#[test]
fn test_next_step_problems() {
    let mut dangling = create_simple_flow();
    dangling.steps[2].next_step = Some("ghost".to_string());
    let report = validate(&dangling);
    assert_eq!(
        messages(&report, Severity::Error),
        vec!["[error] step 'reward': Next step 'ghost' does not exist"]
    );

    let mut looping = create_simple_flow();
    looping.steps[1].next_step = Some("welcome".to_string());
    let report = validate(&looping);
    assert_eq!(
        messages(&report, Severity::Error),
        vec!["[error] step 'welcome': Next-step links form a loop back to this step"]
    );
    assert_eq!(
        messages(&report, Severity::Warning),
        vec!["[warning] step 'reward': Step is never reached"]
    );
}

#[test]
fn test_incomplete_actions() {
    let step = Step::new("broken", "Broken", StepCategory::Ui)
        .with_action(Action::new(ActionKind::HighlightElement))
        .with_action(Action::show_dialog("", Character::Benny))
        .with_action(Action::delay(0))
        .with_exit_action(Action::new(ActionKind::ShadeScreen { opacity: 1.5 }))
        .with_exit_action(Action::new(ActionKind::StartFlow {
            flow_id: "self_start".to_string(),
        }));
    let flow = flow_of("self_start", vec![step]);
    let report = validate(&flow);

    let errors: Vec<String> = report.for_step("broken").map(|i| i.message.clone()).collect();
    assert_eq!(
        errors,
        vec![
            "Action #1 (highlight_element): needs a target",
            "Action #2 (show_dialog): dialog id is empty",
            "Action #3 (delay): delay must be longer than 0 ms",
            "Exit action #1 (shade_screen): opacity 1.5 is outside 0..=1",
            "Exit action #2 (start_flow): a flow cannot start itself",
        ]
    );
}

#[test]
fn test_remove_highlight_without_target_clears_all() {
    let step = click_step("cleanup").with_exit_action(Action::new(ActionKind::RemoveHighlight));
    assert!(validate(&flow_of("cleanup", vec![step])).is_valid());
}

#[test]
fn test_bad_conditions_are_errors() {
    let bad = Condition {
        condition_type: ConditionType::Chapter,
        operator: None,
        value: ConditionValue::Text("one".to_string()),
        key: None,
    };
    let mut flow = create_simple_flow();
    flow.steps[0].completion_conditions.push(bad.clone());
    flow.steps[1].entry_conditions.push(bad);

    let report = validate(&flow);
    let errors = messages(&report, Severity::Error);
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("[error] step 'welcome': Completion condition 'chapter: one'"));
    assert!(errors[1].starts_with("[error] step 'tap_board': Entry condition 'chapter: one'"));
}

#[test]
fn test_step_warnings_and_context() {
    let step = Step::new("quiet", "", StepCategory::Game)
        .with_context(ftue::model::ContextType::Scene, "  ")
        .with_completion(Condition::user_action("merge"));
    let report = validate(&flow_of("quiet", vec![step]));

    assert_eq!(
        messages(&report, Severity::Error),
        vec!["[error] step 'quiet': Step context has an empty value"]
    );
    assert_eq!(
        messages(&report, Severity::Warning),
        vec![
            "[warning] step 'quiet': Step has no name",
            "[warning] step 'quiet': Step has no actions",
        ]
    );
}

#[test]
fn test_validate_with_custom_compiler() {
    use ftue::compiler::parsing::ConditionParser;

    struct StrictUserAction;
    impl ConditionParser for StrictUserAction {
        fn condition_type(&self) -> &str {
            "user_action"
        }
        fn parse(&self, condition: &Condition) -> std::result::Result<Expression, CompileError> {
            Err(CompileError::MissingKey(condition.condition_type.to_string()))
        }
    }

    let compiler = ConditionCompiler::builder()
        .with_custom_parser(Box::new(StrictUserAction))
        .build();
    let report = ftue::validation::validate_with(&create_simple_flow(), &compiler);
    assert_eq!(report.error_count(), 2);
}
