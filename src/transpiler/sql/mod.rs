pub mod mysql;
pub mod postgres;
pub mod sqlite;

use crate::ast::{Expr, Value};

/// Rewrite a `%x` style format string token by token.
///
/// `map` returns the replacement for a token letter; unmapped tokens are kept.
pub(crate) fn translate_format(fmt: &str, map: impl Fn(char) -> Option<&'static str>) -> String {
    let mut out = String::with_capacity(fmt.len());
    let mut chars = fmt.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(token) => match map(token) {
                Some(replacement) => out.push_str(replacement),
                None => {
                    out.push('%');
                    out.push(token);
                }
            },
            None => out.push('%'),
        }
    }
    out
}

/// Apply [`translate_format`] to a literal format argument. Other expressions
/// are returned untouched.
pub(crate) fn translate_format_arg(arg: &Expr, map: impl Fn(char) -> Option<&'static str>) -> Expr {
    match arg {
        Expr::Literal(Value::String(fmt)) => Expr::Literal(Value::String(translate_format(fmt, map))),
        other => other.clone(),
    }
}
