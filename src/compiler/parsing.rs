use crate::ast::{Expression, InputSource, Value};
use crate::error::CompileError;
use crate::model::{Condition, ConditionValue, Operator};
use ahash::AHashMap;

/// Defines the contract for turning one condition type into an `Expression`.
pub trait ConditionParser: Send + Sync {
    fn condition_type(&self) -> &str;
    fn parse(&self, condition: &Condition) -> Result<Expression, CompileError>;
}

/// Builds `left <op> right` for an authored operator.
pub fn compare(operator: Operator, left: Expression, right: Expression) -> Expression {
    let (l, r) = (Box::new(left), Box::new(right));
    match operator {
        Operator::Equal => Expression::Equal(l, r),
        Operator::NotEqual => Expression::NotEqual(l, r),
        Operator::Greater => Expression::GreaterThan(l, r),
        Operator::GreaterOrEqual => Expression::GreaterThanOrEqual(l, r),
        Operator::Less => Expression::SmallerThan(l, r),
        Operator::LessOrEqual => Expression::SmallerThanOrEqual(l, r),
    }
}

fn require_number(condition: &Condition) -> Result<f64, CompileError> {
    match &condition.value {
        ConditionValue::Number(n) => Ok(*n),
        other => Err(invalid_value(condition, "number", other)),
    }
}

fn require_equality(condition: &Condition) -> Result<Operator, CompileError> {
    let operator = condition.effective_operator();
    if operator.is_equality() {
        Ok(operator)
    } else {
        Err(CompileError::UnsupportedOperator {
            condition_type: condition.condition_type.to_string(),
            operator: operator.to_string(),
        })
    }
}

fn invalid_value(condition: &Condition, expected: &'static str, found: &ConditionValue) -> CompileError {
    CompileError::InvalidValue {
        condition: condition.condition_type.to_string(),
        expected,
        found: found.to_string(),
    }
}

/// Splits a flag condition into the flag name and the expected truth value.
/// Accepts `value: "<name>"` or `key: "<name>", value: <bool>`.
fn flag_operands(condition: &Condition) -> Result<(String, bool), CompileError> {
    match (&condition.value, &condition.key) {
        (ConditionValue::Text(name), _) if !name.is_empty() => Ok((name.clone(), true)),
        (ConditionValue::Bool(expected), Some(key)) if !key.is_empty() => {
            Ok((key.clone(), *expected))
        }
        (ConditionValue::Bool(_), _) => Err(CompileError::MissingKey(
            condition.condition_type.to_string(),
        )),
        (other, _) => Err(invalid_value(condition, "non-empty name", other)),
    }
}

struct ChapterParser;
impl ConditionParser for ChapterParser {
    fn condition_type(&self) -> &str {
        "chapter"
    }
    fn parse(&self, condition: &Condition) -> Result<Expression, CompileError> {
        let chapter = require_number(condition)?;
        Ok(compare(
            condition.effective_operator(),
            Expression::Input(InputSource::Chapter),
            Expression::Literal(Value::Number(chapter)),
        ))
    }
}

struct BalanceParser;
impl ConditionParser for BalanceParser {
    fn condition_type(&self) -> &str {
        "balance"
    }
    fn parse(&self, condition: &Condition) -> Result<Expression, CompileError> {
        let amount = require_number(condition)?;
        let currency = condition.key.clone().unwrap_or_else(|| "coins".to_string());
        Ok(compare(
            condition.effective_operator(),
            Expression::Input(InputSource::Balance { currency }),
            Expression::Literal(Value::Number(amount)),
        ))
    }
}

/// `item_on_board` either checks presence (`value` is the item id) or counts
/// copies (`key` is the item id, `value` the count).
struct ItemOnBoardParser;
impl ConditionParser for ItemOnBoardParser {
    fn condition_type(&self) -> &str {
        "item_on_board"
    }
    fn parse(&self, condition: &Condition) -> Result<Expression, CompileError> {
        match &condition.value {
            ConditionValue::Number(count) => {
                let item = condition
                    .key
                    .clone()
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| CompileError::MissingKey("item_on_board".to_string()))?;
                Ok(compare(
                    condition.effective_operator(),
                    Expression::Input(InputSource::BoardCount { item }),
                    Expression::Literal(Value::Number(*count)),
                ))
            }
            _ => {
                let operator = require_equality(condition)?;
                let (item, expected) = flag_operands(condition)?;
                let present = compare(
                    Operator::GreaterOrEqual,
                    Expression::Input(InputSource::BoardCount { item }),
                    Expression::Literal(Value::Number(1.0)),
                );
                if expected == (operator == Operator::Equal) {
                    Ok(present)
                } else {
                    Ok(Expression::Not(Box::new(present)))
                }
            }
        }
    }
}

/// Defines parsers for conditions that test a named boolean flag in the
/// player state, plus the default registration of every built-in parser.
macro_rules! define_condition_parsers {
    ( $( ($struct_name:ident, $condition_type:expr, $variant:ident { $field:ident }) ),* $(,)? ) => {
        $(
            struct $struct_name;
            impl ConditionParser for $struct_name {
                fn condition_type(&self) -> &str { $condition_type }
                fn parse(&self, condition: &Condition) -> Result<Expression, CompileError> {
                    let operator = require_equality(condition)?;
                    let (name, expected) = flag_operands(condition)?;
                    Ok(compare(
                        operator,
                        Expression::Input(InputSource::$variant { $field: name }),
                        Expression::Literal(Value::Bool(expected)),
                    ))
                }
            }
        )*

        pub(super) fn register_default_parsers(registry: &mut AHashMap<String, Box<dyn ConditionParser>>) {
            registry.insert("chapter".to_string(), Box::new(ChapterParser));
            registry.insert("balance".to_string(), Box::new(BalanceParser));
            registry.insert("item_on_board".to_string(), Box::new(ItemOnBoardParser));
            $( registry.insert($condition_type.to_string(), Box::new($struct_name)); )*
        }
    };
}

define_condition_parsers! {
    (UserActionParser, "user_action", UserAction { action }),
    (FeatureActiveParser, "feature_active", FeatureActive { feature }),
    (FlowCompletedParser, "flow_completed", FlowCompleted { flow }),
}
