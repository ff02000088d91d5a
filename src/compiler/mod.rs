use crate::ast::{Expression, Value};
use crate::error::CompileError;
use crate::model::Condition;
use ahash::AHashMap;

pub mod parsing;

use parsing::*;

/// Turns authored condition lists into expressions the evaluator can run.
pub struct ConditionCompiler {
    registry: AHashMap<String, Box<dyn ConditionParser>>,
}

pub struct ConditionCompilerBuilder {
    registry: AHashMap<String, Box<dyn ConditionParser>>,
}

impl ConditionCompilerBuilder {
    pub fn new() -> Self {
        let mut registry: AHashMap<String, Box<dyn ConditionParser>> = AHashMap::new();
        register_default_parsers(&mut registry);
        Self { registry }
    }

    /// Replaces the parser for the condition type the given parser reports.
    pub fn with_custom_parser(mut self, parser: Box<dyn ConditionParser>) -> Self {
        self.registry
            .insert(parser.condition_type().to_string(), parser);
        self
    }

    pub fn build(self) -> ConditionCompiler {
        ConditionCompiler {
            registry: self.registry,
        }
    }
}

impl Default for ConditionCompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ConditionCompiler {
    fn default() -> Self {
        ConditionCompilerBuilder::new().build()
    }
}

impl ConditionCompiler {
    pub fn builder() -> ConditionCompilerBuilder {
        ConditionCompilerBuilder::new()
    }

    /// Compiles a single condition.
    pub fn compile_one(&self, condition: &Condition) -> Result<Expression, CompileError> {
        let type_name = condition.condition_type.as_str();
        let parser = self
            .registry
            .get(type_name)
            .ok_or_else(|| CompileError::UnknownConditionType(type_name.to_string()))?;
        parser.parse(condition)
    }

    /// Compiles a condition list into the conjunction of its members.
    /// An empty list always holds.
    pub fn compile(&self, conditions: &[Condition]) -> Result<Expression, CompileError> {
        let expression = conditions
            .iter()
            .map(|c| self.compile_one(c))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .reduce(|acc, expr| Expression::And(Box::new(acc), Box::new(expr)))
            .unwrap_or(Expression::Literal(Value::Bool(true)));

        log::debug!(
            "Compiled {} condition(s) into:\n{}",
            conditions.len(),
            expression
        );
        Ok(expression)
    }
}
