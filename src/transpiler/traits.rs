//! Transpiler traits and utilities.

use crate::ast::Expr;

/// SQL reserved words that must be quoted when used as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "order",
    "group",
    "user",
    "table",
    "select",
    "from",
    "where",
    "join",
    "left",
    "right",
    "inner",
    "outer",
    "on",
    "and",
    "or",
    "not",
    "null",
    "true",
    "false",
    "limit",
    "offset",
    "as",
    "in",
    "is",
    "like",
    "between",
    "having",
    "union",
    "all",
    "distinct",
    "case",
    "when",
    "then",
    "else",
    "end",
    "create",
    "alter",
    "drop",
    "insert",
    "update",
    "delete",
    "index",
    "key",
    "primary",
    "foreign",
    "references",
    "default",
    "constraint",
    "check",
    "count",
    "values",
    "set",
];

/// Escape an identifier if it's a reserved word or contains special chars.
/// Handles dotted identifiers (e.g., `table.column`) by quoting each part.
pub fn escape_identifier(name: &str, quote: char) -> String {
    if name.contains('.') {
        return name
            .split('.')
            .map(|part| escape_single_identifier(part, quote))
            .collect::<Vec<_>>()
            .join(".");
    }
    escape_single_identifier(name, quote)
}

/// Escape a single identifier part (no dots).
fn escape_single_identifier(name: &str, quote: char) -> String {
    let lower = name.to_lowercase();
    let needs_escaping = name.is_empty()
        || RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
        || name.chars().next().is_some_and(|c| c.is_numeric());

    if needs_escaping {
        let doubled: String = [quote, quote].iter().collect();
        format!("{quote}{}{quote}", name.replace(quote, &doubled))
    } else {
        name.to_string()
    }
}

/// Trait for dialect-specific SQL generation.
pub trait SqlGenerator {
    /// Quote an identifier (table, column or label) when it needs it.
    fn quote_identifier(&self, name: &str) -> String;
    /// Generate the parameter placeholder (e.g., $1, ?) for a given index.
    fn placeholder(&self, index: usize) -> String;
    /// Get the boolean literal (true/false vs 1/0).
    fn bool_literal(&self, val: bool) -> String;

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let mut sql = String::new();
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }
        if let Some(n) = offset {
            sql.push_str(&format!(" OFFSET {}", n));
        }
        sql
    }

    /// Whether a VALUES row may carry the `DEFAULT` keyword.
    fn default_cells(&self) -> bool {
        true
    }

    /// Tail of an INSERT that names no columns.
    fn empty_insert(&self, _rows: usize) -> String {
        " DEFAULT VALUES".to_string()
    }

    /// Replace a whitelisted function call with this dialect's spelling.
    ///
    /// `None` keeps the call as written.
    fn rewrite_function(&self, _name: &str, _args: &[Expr]) -> Option<Expr> {
        None
    }
}
