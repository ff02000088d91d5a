use crate::ast::{Expression, Value};
use crate::error::EvaluationError;
use crate::state::PlayerState;
use crate::trace::TraceFormatter;

mod engine;

use engine::AstEngine;

/// The result of an evaluation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    /// Whether the expression held for the player.
    pub satisfied: bool,
    /// A human-readable explanation of the logic that led to the result.
    pub reason: String,
}

/// Evaluates compiled condition expressions against a player state.
///
/// An `Evaluator` borrows its expression and can be run repeatedly as the
/// simulated player changes.
pub struct Evaluator<'a> {
    expression: &'a Expression,
}

impl<'a> Evaluator<'a> {
    pub fn new(expression: &'a Expression) -> Self {
        Self { expression }
    }

    /// Evaluates the expression.
    ///
    /// # Returns
    ///
    /// * `Ok(EvaluationResult)`: `satisfied` is false when the expression did not hold.
    /// * `Err(EvaluationError)`: when operands have incompatible types, e.g. a
    ///   custom parser compared a flag against a number.
    pub fn eval(&self, player: &PlayerState) -> Result<EvaluationResult, EvaluationError> {
        if self.expression.is_always_true() {
            return Ok(EvaluationResult {
                satisfied: true,
                reason: "No conditions".to_string(),
            });
        }

        let trace = AstEngine::new(self.expression, player).evaluate()?;
        let satisfied = match trace.get_outcome() {
            Value::Bool(b) => b,
            other => {
                return Err(EvaluationError::TypeMismatch {
                    operation: "result".to_string(),
                    expected: "Bool".to_string(),
                    found: other,
                });
            }
        };
        Ok(EvaluationResult {
            satisfied,
            reason: TraceFormatter::format_trace(&trace),
        })
    }
}
