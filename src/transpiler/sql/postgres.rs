use super::translate_format_arg;
use crate::ast::Expr;
use crate::transpiler::traits::{escape_identifier, SqlGenerator};

pub struct PostgresGenerator;

/// MySQL format tokens as `to_char` patterns.
fn to_char_token(token: char) -> Option<&'static str> {
    match token {
        'Y' => Some("YYYY"),
        'y' => Some("YY"),
        'm' => Some("MM"),
        'c' => Some("FMMM"),
        'd' => Some("DD"),
        'e' => Some("FMDD"),
        'H' => Some("HH24"),
        'k' => Some("FMHH24"),
        'h' | 'I' => Some("HH12"),
        'i' => Some("MI"),
        's' | 'S' => Some("SS"),
        'p' => Some("AM"),
        'M' => Some("FMMonth"),
        'b' => Some("Mon"),
        'W' => Some("FMDay"),
        'a' => Some("Dy"),
        'j' => Some("DDD"),
        '%' => Some("%"),
        _ => None,
    }
}

impl SqlGenerator for PostgresGenerator {
    fn quote_identifier(&self, id: &str) -> String {
        escape_identifier(id, '"')
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val {
            "TRUE".to_string()
        } else {
            "FALSE".to_string()
        }
    }

    fn rewrite_function(&self, name: &str, args: &[Expr]) -> Option<Expr> {
        let date_part = |field: &str, col: &Expr| Expr::call("date_part", vec![Expr::literal(field), col.clone()]);
        match (name, args) {
            ("from_unixtime", [col]) => Some(Expr::call("to_timestamp", vec![col.clone()])),
            ("from_unixtime", [col, fmt]) => Some(Expr::call(
                "to_char",
                vec![
                    Expr::call("to_timestamp", vec![col.clone()]),
                    translate_format_arg(fmt, to_char_token),
                ],
            )),
            ("date_format", [col, fmt]) => Some(Expr::call(
                "to_char",
                vec![col.clone(), translate_format_arg(fmt, to_char_token)],
            )),
            ("group_concat", [col]) => Some(Expr::call("string_agg", vec![col.clone(), Expr::literal(",")])),
            ("group_concat", [col, sep]) => Some(Expr::call("string_agg", vec![col.clone(), sep.clone()])),
            ("year", [col]) => Some(date_part("year", col)),
            ("month", [col]) => Some(date_part("month", col)),
            ("day", [col]) => Some(date_part("day", col)),
            _ => None,
        }
    }
}
