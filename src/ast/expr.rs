use serde::{Deserialize, Serialize};

use crate::ast::{BinaryOp, SortOrder, Value};

/// A named placeholder resolved at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    /// Expanding placeholders turn into one parameter per list element.
    pub expanding: bool,
}

impl Param {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self { name: name.into(), expanding: false }
    }

    pub fn expanding(name: impl Into<String>) -> Self {
        Self { name: name.into(), expanding: true }
    }
}

/// A general expression node (column, value, function, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A column of the target table
    Column(String),
    /// An identifier that is not a table column (label reference in ORDER/GROUP BY)
    Identifier(String),
    /// A literal value
    Literal(Value),
    /// A named placeholder
    Param(Param),
    /// Whitelisted SQL function call
    Function { name: String, args: Vec<Expr> },
    /// Binary arithmetic (left op right)
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// An aliased expression (expr AS alias)
    Aliased { expr: Box<Expr>, alias: String },
    /// The column default, for an insert cell a record leaves out
    Default,
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function { name: name.into(), args }
    }

    /// Wrap this expression with a result alias.
    pub fn alias(self, alias: impl Into<String>) -> Self {
        Expr::Aliased {
            expr: Box::new(self),
            alias: alias.into(),
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Column(name) | Expr::Identifier(name) => write!(f, "{}", name),
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Param(p) if p.expanding => write!(f, "(:{})", p.name),
            Expr::Param(p) => write!(f, ":{}", p.name),
            Expr::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Binary { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Expr::Aliased { expr, alias } => write!(f, "{} AS {}", expr, alias),
            Expr::Default => write!(f, "DEFAULT"),
        }
    }
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub expr: Expr,
    pub order: SortOrder,
}

impl OrderItem {
    pub fn asc(expr: Expr) -> Self {
        Self { expr, order: SortOrder::Asc }
    }

    pub fn desc(expr: Expr) -> Self {
        Self { expr, order: SortOrder::Desc }
    }
}
