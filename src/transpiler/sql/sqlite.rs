use super::translate_format_arg;
use crate::ast::Expr;
use crate::transpiler::traits::{escape_identifier, SqlGenerator};

pub struct SqliteGenerator;

/// MySQL format tokens that differ in `strftime`.
fn strftime_token(token: char) -> Option<&'static str> {
    match token {
        'i' => Some("%M"),
        's' => Some("%S"),
        'e' => Some("%d"),
        'k' => Some("%H"),
        _ => None,
    }
}

impl SqlGenerator for SqliteGenerator {
    fn quote_identifier(&self, id: &str) -> String {
        escape_identifier(id, '"')
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn bool_literal(&self, val: bool) -> String {
        if val {
            "1".to_string()
        } else {
            "0".to_string()
        }
    }

    fn default_cells(&self) -> bool {
        false
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (None, None) => String::new(),
            (Some(n), None) => format!(" LIMIT {}", n),
            (limit, Some(m)) => format!(" LIMIT {} OFFSET {}", limit.map_or(-1, |n| n as i128), m),
        }
    }

    fn rewrite_function(&self, name: &str, args: &[Expr]) -> Option<Expr> {
        let unixepoch = || Expr::literal("unixepoch");
        match (name, args) {
            ("from_unixtime", [col]) => Some(Expr::call("datetime", vec![col.clone(), unixepoch()])),
            ("from_unixtime", [col, fmt]) => Some(Expr::call(
                "strftime",
                vec![translate_format_arg(fmt, strftime_token), col.clone(), unixepoch()],
            )),
            ("date_format", [col, fmt]) => Some(Expr::call(
                "strftime",
                vec![translate_format_arg(fmt, strftime_token), col.clone()],
            )),
            ("year", [col]) => Some(Expr::call("strftime", vec![Expr::literal("%Y"), col.clone()])),
            ("month", [col]) => Some(Expr::call("strftime", vec![Expr::literal("%m"), col.clone()])),
            ("day", [col]) => Some(Expr::call("strftime", vec![Expr::literal("%d"), col.clone()])),
            _ => None,
        }
    }
}
