//! Tests for compiling authored conditions into expressions.
use ftue::compiler::parsing::ConditionParser;
use ftue::model::ConditionValue;
use ftue::prelude::*;

fn input(source: InputSource) -> Box<Expression> {
    Box::new(Expression::Input(source))
}

fn literal(value: Value) -> Box<Expression> {
    Box::new(Expression::Literal(value))
}

#[test]
fn test_empty_condition_list_always_holds() {
    let compiler = ConditionCompiler::default();
    let expression = compiler.compile(&[]).unwrap();
    assert!(expression.is_always_true());
}

#[test]
fn test_chapter_and_balance() {
    let compiler = ConditionCompiler::default();

    let chapter = compiler
        .compile_one(&Condition::chapter(Operator::Greater, 2))
        .unwrap();
    assert_eq!(
        chapter,
        Expression::GreaterThan(input(InputSource::Chapter), literal(Value::Number(2.0)))
    );

    let balance = compiler
        .compile_one(&Condition::balance("gems", Operator::Less, 10.0))
        .unwrap();
    assert_eq!(
        balance,
        Expression::SmallerThan(
            input(InputSource::Balance {
                currency: "gems".to_string()
            }),
            literal(Value::Number(10.0))
        )
    );
}

#[test]
fn test_balance_defaults_to_coins_and_at_least() {
    let condition = Condition {
        condition_type: ConditionType::Balance,
        operator: None,
        value: ConditionValue::Number(50.0),
        key: None,
    };
    let expression = ConditionCompiler::default().compile_one(&condition).unwrap();
    assert_eq!(
        expression,
        Expression::GreaterThanOrEqual(
            input(InputSource::Balance {
                currency: "coins".to_string()
            }),
            literal(Value::Number(50.0))
        )
    );
}

#[test]
fn test_flag_conditions() {
    let compiler = ConditionCompiler::default();

    let clicked = compiler.compile_one(&Condition::user_action("click")).unwrap();
    assert_eq!(
        clicked,
        Expression::Equal(
            input(InputSource::UserAction {
                action: "click".to_string()
            }),
            literal(Value::Bool(true))
        )
    );

    // `key` + boolean value form
    let inactive = Condition {
        condition_type: ConditionType::FeatureActive,
        operator: None,
        value: ConditionValue::Bool(false),
        key: Some("flowers".to_string()),
    };
    assert_eq!(
        compiler.compile_one(&inactive).unwrap(),
        Expression::Equal(
            input(InputSource::FeatureActive {
                feature: "flowers".to_string()
            }),
            literal(Value::Bool(false))
        )
    );
}

#[test]
fn test_item_on_board_presence_and_count() {
    let compiler = ConditionCompiler::default();
    let board = || {
        input(InputSource::BoardCount {
            item: "wrench_2".to_string(),
        })
    };

    let present = compiler
        .compile_one(&Condition::item_on_board("wrench_2"))
        .unwrap();
    assert_eq!(
        present,
        Expression::GreaterThanOrEqual(board(), literal(Value::Number(1.0)))
    );

    let mut absent_condition = Condition::item_on_board("wrench_2");
    absent_condition.operator = Some(Operator::NotEqual);
    let absent = compiler.compile_one(&absent_condition).unwrap();
    assert_eq!(absent, Expression::Not(Box::new(present)));

    let count = compiler
        .compile_one(&Condition::item_count("wrench_2", Operator::GreaterOrEqual, 3))
        .unwrap();
    assert_eq!(
        count,
        Expression::GreaterThanOrEqual(board(), literal(Value::Number(3.0)))
    );
}

#[test]
fn test_condition_list_is_a_conjunction() {
    let compiler = ConditionCompiler::default();
    let expression = compiler
        .compile(&[
            Condition::chapter(Operator::GreaterOrEqual, 2),
            Condition::feature_active("flowers"),
            Condition::flow_completed("onboarding_core_loop"),
        ])
        .unwrap();

    let Expression::And(left, right) = &expression else {
        panic!("expected AND, got {:?}", expression);
    };
    assert!(matches!(**left, Expression::And(_, _)));
    assert!(matches!(**right, Expression::Equal(_, _)));

    let mut inputs = Vec::new();
    expression.inputs(&mut inputs);
    assert_eq!(inputs.len(), 3);
    assert_eq!(inputs[0], &InputSource::Chapter);
}

#[test]
fn test_invalid_values_are_rejected() {
    let compiler = ConditionCompiler::default();

    let text_chapter = Condition {
        condition_type: ConditionType::Chapter,
        operator: None,
        value: ConditionValue::Text("one".to_string()),
        key: None,
    };
    assert_eq!(
        compiler.compile_one(&text_chapter).unwrap_err(),
        CompileError::InvalidValue {
            condition: "chapter".to_string(),
            expected: "number",
            found: "one".to_string(),
        }
    );

    let mut ordered_flag = Condition::feature_active("flowers");
    ordered_flag.operator = Some(Operator::Greater);
    assert_eq!(
        compiler.compile_one(&ordered_flag).unwrap_err(),
        CompileError::UnsupportedOperator {
            condition_type: "feature_active".to_string(),
            operator: ">".to_string(),
        }
    );

    let keyless_count = Condition {
        condition_type: ConditionType::ItemOnBoard,
        operator: Some(Operator::GreaterOrEqual),
        value: ConditionValue::Number(2.0),
        key: None,
    };
    assert_eq!(
        compiler.compile_one(&keyless_count).unwrap_err(),
        CompileError::MissingKey("item_on_board".to_string())
    );

    let empty_action = Condition::user_action("");
    assert!(matches!(
        compiler.compile_one(&empty_action),
        Err(CompileError::InvalidValue { .. })
    ));
}

#[test]
fn test_one_bad_condition_fails_the_list() {
    let compiler = ConditionCompiler::default();
    let result = compiler.compile(&[
        Condition::user_action("click"),
        Condition::user_action(""),
    ]);
    assert!(result.is_err());
}

/// Reads `chapter` conditions as "chapter is unlocked at all".
struct ChapterUnlockedParser;

impl ConditionParser for ChapterUnlockedParser {
    fn condition_type(&self) -> &str {
        "chapter"
    }

    fn parse(&self, _condition: &Condition) -> std::result::Result<Expression, CompileError> {
        Ok(Expression::GreaterThan(
            input(InputSource::Chapter),
            literal(Value::Number(0.0)),
        ))
    }
}

#[test]
fn test_custom_parser_overrides_builtin() {
    let compiler = ConditionCompiler::builder()
        .with_custom_parser(Box::new(ChapterUnlockedParser))
        .build();

    let expression = compiler
        .compile_one(&Condition::chapter(Operator::Equal, 7))
        .unwrap();
    assert_eq!(
        expression,
        Expression::GreaterThan(input(InputSource::Chapter), literal(Value::Number(0.0)))
    );

    // Other types keep their built-in parser.
    assert!(compiler.compile_one(&Condition::user_action("tap")).is_ok());
}
