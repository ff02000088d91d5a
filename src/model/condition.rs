use serde::{Deserialize, Serialize};
use std::fmt;

/// What part of the player state a condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    Chapter,
    Balance,
    ItemOnBoard,
    UserAction,
    FeatureActive,
    FlowCompleted,
}

impl ConditionType {
    pub const ALL: [ConditionType; 6] = [
        ConditionType::Chapter,
        ConditionType::Balance,
        ConditionType::ItemOnBoard,
        ConditionType::UserAction,
        ConditionType::FeatureActive,
        ConditionType::FlowCompleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::Chapter => "chapter",
            ConditionType::Balance => "balance",
            ConditionType::ItemOnBoard => "item_on_board",
            ConditionType::UserAction => "user_action",
            ConditionType::FeatureActive => "feature_active",
            ConditionType::FlowCompleted => "flow_completed",
        }
    }

    /// Operator used when a condition leaves it unset.
    pub fn default_operator(&self) -> Operator {
        match self {
            ConditionType::Balance => Operator::GreaterOrEqual,
            _ => Operator::Equal,
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, Operator::Equal | Operator::NotEqual)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The right-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Bool(b) => write!(f, "{}", b),
            ConditionValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            ConditionValue::Number(n) => write!(f, "{}", n),
            ConditionValue::Text(s) => f.write_str(s),
        }
    }
}

/// A predicate over the player state, as authored in the condition builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    pub value: ConditionValue,
    /// Currency for `balance`, item id for a counted `item_on_board`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Condition {
    pub fn chapter(operator: Operator, chapter: u32) -> Self {
        Self {
            condition_type: ConditionType::Chapter,
            operator: Some(operator),
            value: ConditionValue::Number(chapter as f64),
            key: None,
        }
    }

    pub fn balance(currency: &str, operator: Operator, amount: f64) -> Self {
        Self {
            condition_type: ConditionType::Balance,
            operator: Some(operator),
            value: ConditionValue::Number(amount),
            key: Some(currency.to_string()),
        }
    }

    pub fn item_on_board(item_id: &str) -> Self {
        Self::text(ConditionType::ItemOnBoard, item_id)
    }

    pub fn item_count(item_id: &str, operator: Operator, count: u32) -> Self {
        Self {
            condition_type: ConditionType::ItemOnBoard,
            operator: Some(operator),
            value: ConditionValue::Number(count as f64),
            key: Some(item_id.to_string()),
        }
    }

    pub fn user_action(action: &str) -> Self {
        Self::text(ConditionType::UserAction, action)
    }

    pub fn feature_active(feature_id: &str) -> Self {
        Self::text(ConditionType::FeatureActive, feature_id)
    }

    pub fn flow_completed(flow_id: &str) -> Self {
        Self::text(ConditionType::FlowCompleted, flow_id)
    }

    fn text(condition_type: ConditionType, value: &str) -> Self {
        Self {
            condition_type,
            operator: None,
            value: ConditionValue::Text(value.to_string()),
            key: None,
        }
    }

    pub fn effective_operator(&self) -> Operator {
        self.operator
            .unwrap_or_else(|| self.condition_type.default_operator())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.key, &self.value) {
            (Some(key), _) => write!(
                f,
                "{}.{} {} {}",
                self.condition_type,
                key,
                self.effective_operator(),
                self.value
            ),
            (None, ConditionValue::Number(_)) => write!(
                f,
                "{} {} {}",
                self.condition_type,
                self.effective_operator(),
                self.value
            ),
            (None, _) => match self.operator {
                Some(Operator::NotEqual) => {
                    write!(f, "{}: not {}", self.condition_type, self.value)
                }
                _ => write!(f, "{}: {}", self.condition_type, self.value),
            },
        }
    }
}
