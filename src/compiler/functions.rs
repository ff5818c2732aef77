//! Whitelisted SQL functions for projections.
//!
//! Only names registered here can ever reach a generated statement. Each
//! entry carries its accepted arity and a builder that turns resolved
//! arguments into an expression.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::ast::Expr;

type Builder = fn(&'static str, Vec<Expr>) -> Expr;

/// A registered SQL function.
#[derive(Debug, Clone, Copy)]
pub struct SqlFunction {
    pub name: &'static str,
    pub min_args: usize,
    pub max_args: Option<usize>,
    build: Builder,
}

impl SqlFunction {
    const fn new(name: &'static str, min_args: usize, max_args: Option<usize>) -> Self {
        Self {
            name,
            min_args,
            max_args,
            build: call,
        }
    }

    const fn with_builder(mut self, build: Builder) -> Self {
        self.build = build;
        self
    }

    pub fn accepts_arity(&self, n: usize) -> bool {
        n >= self.min_args && self.max_args.is_none_or(|max| n <= max)
    }

    /// Build the call, or `None` when the argument count is out of range.
    pub fn apply(&self, args: Vec<Expr>) -> Option<Expr> {
        if !self.accepts_arity(args.len()) {
            tracing::warn!(
                "function `{}` called with {} arguments, expected {}..{}",
                self.name,
                args.len(),
                self.min_args,
                self.max_args.map(|m| m.to_string()).unwrap_or_default()
            );
            return None;
        }
        Some((self.build)(self.name, args))
    }
}

fn call(name: &'static str, args: Vec<Expr>) -> Expr {
    Expr::call(name, args)
}

/// `count_distinct(x)` has no direct SQL spelling; it is `count(distinct(x))`.
fn count_distinct(_: &'static str, args: Vec<Expr>) -> Expr {
    Expr::call("count", vec![Expr::call("distinct", args)])
}

/// `ifnull` is spelled `coalesce` everywhere.
fn ifnull(_: &'static str, args: Vec<Expr>) -> Expr {
    Expr::call("coalesce", args)
}

const VARIADIC: Option<usize> = None;

static FUNCTIONS: LazyLock<HashMap<&'static str, SqlFunction>> = LazyLock::new(|| {
    [
        // aggregates
        SqlFunction::new("count", 1, Some(1)),
        SqlFunction::new("count_distinct", 1, Some(1)).with_builder(count_distinct),
        SqlFunction::new("sum", 1, Some(1)),
        SqlFunction::new("avg", 1, Some(1)),
        SqlFunction::new("min", 1, Some(1)),
        SqlFunction::new("max", 1, Some(1)),
        SqlFunction::new("group_concat", 1, Some(2)),
        // numeric
        SqlFunction::new("abs", 1, Some(1)),
        SqlFunction::new("round", 1, Some(2)),
        SqlFunction::new("ceil", 1, Some(1)),
        SqlFunction::new("floor", 1, Some(1)),
        // string
        SqlFunction::new("lower", 1, Some(1)),
        SqlFunction::new("upper", 1, Some(1)),
        SqlFunction::new("length", 1, Some(1)),
        SqlFunction::new("trim", 1, Some(1)),
        SqlFunction::new("ltrim", 1, Some(1)),
        SqlFunction::new("rtrim", 1, Some(1)),
        SqlFunction::new("substr", 2, Some(3)),
        SqlFunction::new("replace", 3, Some(3)),
        SqlFunction::new("concat", 1, VARIADIC),
        // null handling
        SqlFunction::new("coalesce", 1, VARIADIC),
        SqlFunction::new("ifnull", 2, Some(2)).with_builder(ifnull),
        SqlFunction::new("nullif", 2, Some(2)),
        // date and time
        SqlFunction::new("from_unixtime", 1, Some(2)),
        SqlFunction::new("date_format", 2, Some(2)),
        SqlFunction::new("strftime", 2, VARIADIC),
        SqlFunction::new("to_char", 2, Some(2)),
        SqlFunction::new("date", 1, VARIADIC),
        SqlFunction::new("year", 1, Some(1)),
        SqlFunction::new("month", 1, Some(1)),
        SqlFunction::new("day", 1, Some(1)),
    ]
    .into_iter()
    .map(|f| (f.name, f))
    .collect()
});

/// Look up a whitelisted function by name (case-insensitive).
pub fn lookup(name: &str) -> Option<&'static SqlFunction> {
    FUNCTIONS.get(name.to_ascii_lowercase().as_str())
}

pub fn is_supported(name: &str) -> bool {
    lookup(name).is_some()
}
