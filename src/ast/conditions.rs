use serde::{Deserialize, Serialize};

use crate::ast::{Expr, LogicalOp, Operator};

/// A boolean predicate over table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// `left op right`
    Compare {
        left: Expr,
        op: Operator,
        right: Expr,
    },
    /// Conjunction of two or more conditions
    And(Vec<Condition>),
    /// Disjunction of two or more conditions
    Or(Vec<Condition>),
    /// Caller-constructed SQL fragment, emitted verbatim
    Raw(String),
}

impl Condition {
    pub fn compare(left: Expr, op: Operator, right: Expr) -> Self {
        Condition::Compare { left, op, right }
    }

    /// Fold a list of conditions into one.
    ///
    /// No items yields `None`, a single item is returned unchanged.
    pub fn combine(mut items: Vec<Condition>, op: LogicalOp) -> Option<Condition> {
        match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(match op {
                LogicalOp::And => Condition::And(items),
                LogicalOp::Or => Condition::Or(items),
            }),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Compare { left, op, right } => write!(f, "{} {} {}", left, op.sql_symbol(), right),
            Condition::And(items) | Condition::Or(items) => {
                let joiner = if matches!(self, Condition::And(_)) { " AND " } else { " OR " };
                let parts: Vec<String> = items.iter().map(|c| format!("({})", c)).collect();
                write!(f, "{}", parts.join(joiner))
            }
            Condition::Raw(sql) => write!(f, "({})", sql),
        }
    }
}
