//! Tests for evaluating compiled conditions against a player.
mod common;
use common::*;
use ftue::compiler::parsing::ConditionParser;
use ftue::prelude::*;

fn evaluate(conditions: &[Condition], player: &PlayerState) -> EvaluationResult {
    let expression = ConditionCompiler::default().compile(conditions).unwrap();
    Evaluator::new(&expression).eval(player).unwrap()
}

#[test]
fn test_chapter_condition() {
    let conditions = [Condition::chapter(Operator::GreaterOrEqual, 2)];

    let result = evaluate(&conditions, &player_at_chapter(3));
    assert!(result.satisfied);
    assert_eq!(result.reason, "$chapter (was 3) >= 2");

    let result = evaluate(&conditions, &player_at_chapter(1));
    assert!(!result.satisfied);
}

#[test]
fn test_conjunction_reason() {
    let mut player = player_at_chapter(3);
    player.activate_feature("flowers");

    let result = evaluate(
        &[
            Condition::chapter(Operator::GreaterOrEqual, 2),
            Condition::feature_active("flowers"),
        ],
        &player,
    );
    assert!(result.satisfied);
    assert_eq!(
        result.reason,
        "$chapter (was 3) >= 2 AND $feature.flowers (was true) == true"
    );
}

#[test]
fn test_short_circuit_leaves_out_right_side() {
    let result = evaluate(
        &[
            Condition::chapter(Operator::GreaterOrEqual, 2),
            Condition::feature_active("flowers"),
        ],
        &player_at_chapter(1),
    );
    assert!(!result.satisfied);
    assert_eq!(result.reason, "$chapter (was 1) >= 2");
}

#[test]
fn test_balance_and_board() {
    let mut player = PlayerState::default();
    player.grant("coins", 150.0);
    player.add_item("wrench_2");

    let result = evaluate(
        &[
            Condition::balance("coins", Operator::GreaterOrEqual, 100.0),
            Condition::item_on_board("wrench_2"),
        ],
        &player,
    );
    assert!(result.satisfied);
    assert!(result.reason.contains("$balance.coins (was 150) >= 100"));
    assert!(result.reason.contains("$board.wrench_2 (was 1) >= 1"));
}

#[test]
fn test_negated_item_is_parenthesized() {
    let mut absent = Condition::item_on_board("wrench_2");
    absent.operator = Some(Operator::NotEqual);

    let result = evaluate(&[absent], &PlayerState::default());
    assert!(result.satisfied);
    assert_eq!(result.reason, "NOT ($board.wrench_2 (was 0) >= 1)");
}

#[test]
fn test_user_actions_and_completed_flows() {
    let mut player = PlayerState::default();
    let conditions = [
        Condition::user_action("click"),
        Condition::flow_completed("onboarding_core_loop"),
    ];

    assert!(!evaluate(&conditions, &player).satisfied);

    player.record_action("click");
    player.complete_flow("onboarding_core_loop");
    let result = evaluate(&conditions, &player);
    assert!(result.satisfied);
    assert_eq!(
        result.reason,
        "$user.click (was true) == true AND $completed.onboarding_core_loop (was true) == true"
    );

    player.clear_step_actions();
    assert!(!evaluate(&conditions, &player).satisfied);
}

#[test]
fn test_no_conditions() {
    let result = evaluate(&[], &PlayerState::default());
    assert!(result.satisfied);
    assert_eq!(result.reason, "No conditions");
}

/// Compares the chapter against a flag, which the engine must refuse.
struct BrokenChapterParser;

impl ConditionParser for BrokenChapterParser {
    fn condition_type(&self) -> &str {
        "chapter"
    }

    fn parse(&self, _condition: &Condition) -> std::result::Result<Expression, CompileError> {
        Ok(Expression::Equal(
            Box::new(Expression::Input(InputSource::Chapter)),
            Box::new(Expression::Literal(Value::Bool(true))),
        ))
    }
}

#[test]
fn test_type_mismatch_is_an_error() {
    let compiler = ConditionCompiler::builder()
        .with_custom_parser(Box::new(BrokenChapterParser))
        .build();
    let expression = compiler
        .compile(&[Condition::chapter(Operator::Equal, 1)])
        .unwrap();

    let error = Evaluator::new(&expression)
        .eval(&PlayerState::default())
        .unwrap_err();
    assert_eq!(
        error,
        EvaluationError::TypeMismatch {
            operation: "==".to_string(),
            expected: "Number".to_string(),
            found: Value::Bool(true),
        }
    );
}
