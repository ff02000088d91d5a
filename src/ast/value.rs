use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime value types used during evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Bool(_) => "Bool",
            Value::Text(_) => "Text",
            Value::Null => "Null",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "\"{}\"", s),
            Value::Null => write!(f, "null"),
        }
    }
}

/// The piece of player state a leaf node reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum InputSource {
    Chapter,
    Balance { currency: String },
    BoardCount { item: String },
    FeatureActive { feature: String },
    FlowCompleted { flow: String },
    /// Whether the user performed `action` during the current step.
    UserAction { action: String },
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Chapter => write!(f, "$chapter"),
            InputSource::Balance { currency } => write!(f, "$balance.{}", currency),
            InputSource::BoardCount { item } => write!(f, "$board.{}", item),
            InputSource::FeatureActive { feature } => write!(f, "$feature.{}", feature),
            InputSource::FlowCompleted { flow } => write!(f, "$completed.{}", flow),
            InputSource::UserAction { action } => write!(f, "$user.{}", action),
        }
    }
}
