use crate::ast::{EvaluationTrace, Expression, Value};
use crate::error::EvaluationError;
use crate::state::PlayerState;

/// The core recursive engine for evaluating a single AST against a player.
pub(super) struct AstEngine<'a> {
    expression: &'a Expression,
    player: &'a PlayerState,
}

impl<'a> AstEngine<'a> {
    pub(super) fn new(expression: &'a Expression, player: &'a PlayerState) -> Self {
        Self { expression, player }
    }

    /// Evaluates the AST and returns a trace of the execution.
    pub(super) fn evaluate(&self) -> Result<EvaluationTrace, EvaluationError> {
        self.evaluate_recursive(self.expression)
    }

    fn evaluate_recursive(&self, expr: &Expression) -> Result<EvaluationTrace, EvaluationError> {
        match expr {
            // --- Comparison Operations ---
            Expression::GreaterThan(l, r) => self.eval_comparison(l, r, ">", |a, b| a > b),
            Expression::SmallerThan(l, r) => self.eval_comparison(l, r, "<", |a, b| a < b),
            Expression::GreaterThanOrEqual(l, r) => {
                self.eval_comparison(l, r, ">=", |a, b| a >= b)
            }
            Expression::SmallerThanOrEqual(l, r) => {
                self.eval_comparison(l, r, "<=", |a, b| a <= b)
            }

            // --- Equality ---
            Expression::Equal(l, r) => self.eval_equality(l, r, "==", true),
            Expression::NotEqual(l, r) => self.eval_equality(l, r, "!=", false),

            // --- Logical Operations ---
            Expression::And(l, r) => self.eval_logical(l, r, "AND", false),
            Expression::Or(l, r) => self.eval_logical(l, r, "OR", true),
            Expression::Not(v) => {
                let child_trace = self.evaluate_recursive(v)?;
                let outcome = match child_trace.get_outcome() {
                    Value::Bool(val) => Value::Bool(!val),
                    val => return Err(self.type_mismatch("NOT", "Bool", val)),
                };
                Ok(EvaluationTrace::UnaryOp {
                    op_symbol: "NOT",
                    child: Box::new(child_trace),
                    outcome,
                })
            }

            // --- Leaves ---
            Expression::Literal(val) => Ok(EvaluationTrace::Leaf {
                source: val.to_string(),
                value: val.clone(),
            }),
            Expression::Input(source) => Ok(EvaluationTrace::Leaf {
                source: source.to_string(),
                value: self.player.read(source),
            }),
        }
    }

    /// AND / OR with short-circuit: `decisive` is the left value that makes
    /// evaluating the right side unnecessary.
    fn eval_logical(
        &self,
        l: &Expression,
        r: &Expression,
        op: &'static str,
        decisive: bool,
    ) -> Result<EvaluationTrace, EvaluationError> {
        let left_trace = self.evaluate_recursive(l)?;
        match left_trace.get_outcome() {
            Value::Bool(lv) if lv == decisive => {
                return Ok(EvaluationTrace::BinaryOp {
                    op_symbol: op,
                    left: Box::new(left_trace),
                    right: Box::new(EvaluationTrace::NotEvaluated),
                    outcome: Value::Bool(decisive),
                });
            }
            Value::Bool(_) => {}
            other => return Err(self.type_mismatch(op, "Bool", other)),
        }
        let right_trace = self.evaluate_recursive(r)?;
        let outcome = match right_trace.get_outcome() {
            Value::Bool(rv) => Value::Bool(rv),
            other => return Err(self.type_mismatch(op, "Bool", other)),
        };
        Ok(EvaluationTrace::BinaryOp {
            op_symbol: op,
            left: Box::new(left_trace),
            right: Box::new(right_trace),
            outcome,
        })
    }

    fn eval_equality(
        &self,
        l: &Expression,
        r: &Expression,
        op: &'static str,
        equal: bool,
    ) -> Result<EvaluationTrace, EvaluationError> {
        let left_trace = self.evaluate_recursive(l)?;
        let right_trace = self.evaluate_recursive(r)?;
        let (lv, rv) = (left_trace.get_outcome(), right_trace.get_outcome());
        if std::mem::discriminant(&lv) != std::mem::discriminant(&rv) {
            return Err(self.type_mismatch(op, lv.type_name(), rv));
        }
        let outcome = Value::Bool((lv == rv) == equal);
        Ok(EvaluationTrace::BinaryOp {
            op_symbol: op,
            left: Box::new(left_trace),
            right: Box::new(right_trace),
            outcome,
        })
    }

    fn eval_comparison<F>(
        &self,
        l: &Expression,
        r: &Expression,
        op: &'static str,
        f: F,
    ) -> Result<EvaluationTrace, EvaluationError>
    where
        F: Fn(f64, f64) -> bool,
    {
        let left_trace = self.evaluate_recursive(l)?;
        let right_trace = self.evaluate_recursive(r)?;
        let outcome = match (left_trace.get_outcome(), right_trace.get_outcome()) {
            (Value::Number(lv), Value::Number(rv)) => Value::Bool(f(lv, rv)),
            (Value::Number(_), r_val) => return Err(self.type_mismatch(op, "Number", r_val)),
            (l_val, _) => return Err(self.type_mismatch(op, "Number", l_val)),
        };
        Ok(EvaluationTrace::BinaryOp {
            op_symbol: op,
            left: Box::new(left_trace),
            right: Box::new(right_trace),
            outcome,
        })
    }

    fn type_mismatch(&self, op: &str, expected: &str, found: Value) -> EvaluationError {
        EvaluationError::TypeMismatch {
            operation: op.to_string(),
            expected: expected.to_string(),
            found,
        }
    }
}
