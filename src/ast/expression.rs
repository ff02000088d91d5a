use super::{InputSource, Value};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The Abstract Syntax Tree of a compiled condition list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum Expression {
    // Logical
    Not(Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),

    // Comparison
    Equal(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),
    GreaterThan(Box<Expression>, Box<Expression>),
    GreaterThanOrEqual(Box<Expression>, Box<Expression>),
    SmallerThan(Box<Expression>, Box<Expression>),
    SmallerThanOrEqual(Box<Expression>, Box<Expression>),

    // Leaf nodes
    Literal(Value),
    Input(InputSource),
}

impl Expression {
    /// True for the expression an empty condition list compiles to.
    pub fn is_always_true(&self) -> bool {
        matches!(self, Expression::Literal(Value::Bool(true)))
    }

    /// Collects every player-state input the expression reads.
    pub fn inputs<'a>(&'a self, out: &mut Vec<&'a InputSource>) {
        match self {
            Expression::Input(source) => out.push(source),
            Expression::And(l, r)
            | Expression::Or(l, r)
            | Expression::Equal(l, r)
            | Expression::NotEqual(l, r)
            | Expression::GreaterThan(l, r)
            | Expression::GreaterThanOrEqual(l, r)
            | Expression::SmallerThan(l, r)
            | Expression::SmallerThanOrEqual(l, r) => {
                l.inputs(out);
                r.inputs(out);
            }
            Expression::Not(v) => v.inputs(out),
            Expression::Literal(_) => {}
        }
    }
}

/// Prints an expression as an indented tree.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_as_tree(self, f, "", true)
    }
}

fn fmt_as_tree(
    expr: &Expression,
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    is_last: bool,
) -> fmt::Result {
    let node_marker = if is_last { "└── " } else { "├── " };
    write!(f, "{}{}", prefix, node_marker)?;

    let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });

    match expr {
        Expression::Literal(v) => writeln!(f, "Literal: {}", v),
        Expression::Input(s) => writeln!(f, "Input: {}", s),
        Expression::Not(v) => {
            writeln!(f, "NOT")?;
            fmt_as_tree(v, f, &child_prefix, true)
        }
        Expression::And(l, r) => fmt_binary(f, "AND", l, r, &child_prefix),
        Expression::Or(l, r) => fmt_binary(f, "OR", l, r, &child_prefix),
        Expression::Equal(l, r) => fmt_binary(f, "==", l, r, &child_prefix),
        Expression::NotEqual(l, r) => fmt_binary(f, "!=", l, r, &child_prefix),
        Expression::GreaterThan(l, r) => fmt_binary(f, ">", l, r, &child_prefix),
        Expression::GreaterThanOrEqual(l, r) => fmt_binary(f, ">=", l, r, &child_prefix),
        Expression::SmallerThan(l, r) => fmt_binary(f, "<", l, r, &child_prefix),
        Expression::SmallerThanOrEqual(l, r) => fmt_binary(f, "<=", l, r, &child_prefix),
    }
}

fn fmt_binary(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    l: &Expression,
    r: &Expression,
    prefix: &str,
) -> fmt::Result {
    writeln!(f, "{}", name)?;
    fmt_as_tree(l, f, prefix, false)?;
    fmt_as_tree(r, f, prefix, true)
}
