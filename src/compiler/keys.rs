//! Projection keys to selectable expressions.

use crate::access::FieldPredicate;
use crate::ast::{Expr, Value};
use crate::compiler::args::parse_args;
use crate::compiler::functions;
use crate::document::{KeyDescriptor, ProjectionKey};
use crate::error::ModelResult;
use crate::schema::Table;

/// Placeholder standing for the descriptor's column inside `args`.
const COLUMN_PLACEHOLDER: &str = "$column";

/// Compile projection keys in order.
///
/// Keys that cannot be resolved are skipped with a warning. Only argument
/// tuples that fail to parse abort the whole call.
pub fn compile_keys(table: &Table, keys: &[ProjectionKey], filter: &dyn FieldPredicate) -> ModelResult<Vec<Expr>> {
    let mut columns = Vec::with_capacity(keys.len());
    for key in keys {
        let expr = match key {
            ProjectionKey::Descriptor(desc) => compile_descriptor(table, desc, filter),
            ProjectionKey::Expr(text) => compile_key_str(table, text, filter)?,
        };
        columns.extend(expr);
    }
    Ok(columns)
}

fn resolve_column(table: &Table, name: &str, filter: &dyn FieldPredicate) -> Option<Expr> {
    (table.has_column(name) && filter.accepts(name)).then(|| Expr::column(name))
}

/// `{column, func, label, args}`
fn compile_descriptor(table: &Table, desc: &KeyDescriptor, filter: &dyn FieldPredicate) -> Option<Expr> {
    let mut expr = resolve_column(table, &desc.column, filter)?;

    if let Some(func_name) = &desc.func {
        let Some(func) = functions::lookup(func_name) else {
            tracing::warn!("unsupported function `{}` for column `{}`, key skipped", func_name, desc.column);
            return None;
        };
        let has_placeholder = desc.args.iter().any(|a| a.as_str() == Some(COLUMN_PLACEHOLDER));
        let args = if has_placeholder {
            desc.args
                .iter()
                .map(|a| match a.as_str() {
                    Some(COLUMN_PLACEHOLDER) => expr.clone(),
                    _ => Expr::Literal(a.clone()),
                })
                .collect()
        } else {
            std::iter::once(expr)
                .chain(desc.args.iter().cloned().map(Expr::Literal))
                .collect()
        };
        expr = func.apply(args)?;
    }

    Some(match &desc.label {
        Some(label) => expr.alias(label.as_str()),
        None => expr,
    })
}

/// `name`, `func(args)` or `func(args): alias`.
fn compile_key_str(table: &Table, key: &str, filter: &dyn FieldPredicate) -> ModelResult<Option<Expr>> {
    let (body, label) = match key.rfind("):") {
        Some(pos) => (&key[..=pos], Some(key[pos + 2..].trim())),
        None => (key, None),
    };

    let expr = match body.find('(') {
        Some(start) if start > 0 => {
            let func_name = body[..start].trim();
            let end = body.rfind(')').unwrap_or(body.len());
            let args_src = body.get(start..=end).unwrap_or(&body[start..]);
            let args = parse_args(args_src)?;
            match compile_call(table, func_name, args, filter) {
                Some(expr) => expr,
                None => {
                    tracing::warn!("not parse key: {}", key);
                    return Ok(None);
                }
            }
        }
        _ => match resolve_column(table, body, filter) {
            Some(expr) => expr,
            None => return Ok(None),
        },
    };

    Ok(Some(match label {
        Some(label) if !label.is_empty() => expr.alias(label),
        _ => expr,
    }))
}

/// Resolve `$col` / `$$literal` arguments and apply a whitelisted function.
///
/// Every `$col` must name a visible column, and at least one must be present.
fn compile_call(table: &Table, func_name: &str, args: Vec<Value>, filter: &dyn FieldPredicate) -> Option<Expr> {
    let func = functions::lookup(func_name)?;
    let mut argv = Vec::with_capacity(args.len());
    let mut has_column = false;

    for arg in args {
        match arg {
            Value::String(s) if s.starts_with("$$") => argv.push(Expr::Literal(Value::String(s[1..].to_string()))),
            Value::String(s) if s.starts_with('$') => {
                argv.push(resolve_column(table, &s[1..], filter)?);
                has_column = true;
            }
            other => argv.push(Expr::Literal(other)),
        }
    }

    if !has_column {
        return None;
    }
    func.apply(argv)
}
