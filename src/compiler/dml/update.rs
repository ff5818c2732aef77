//! UPDATE statement builder.

use serde_json::{Map, Value as Json};

use crate::access::FieldPredicate;
use crate::ast::{BinaryOp, Expr, Param, Update, Value};
use crate::compiler::conditions::compile_where;
use crate::document::FilterDocument;
use crate::error::{ModelError, ModelResult};
use crate::schema::Table;

const BIND_PREFIX: &str = "$bind.";
const INCR_PREFIX: &str = "$incr.";

/// Build one UPDATE per update document.
///
/// `data` is `{"values": {...}, "where": {...}}` or a list of those. Every
/// document must carry a non-empty `values` map, otherwise the whole call
/// fails. `value_filter` gates assigned columns and `where_filter` gates the
/// columns the `where` document may reference.
pub fn build_update(
    table: &Table,
    data: &Json,
    value_filter: &dyn FieldPredicate,
    where_filter: &dyn FieldPredicate,
) -> ModelResult<Vec<Update>> {
    match data {
        Json::Array(items) => items
            .iter()
            .map(|item| build_one(table, item, value_filter, where_filter))
            .collect(),
        other => Ok(vec![build_one(table, other, value_filter, where_filter)?]),
    }
}

fn build_one(
    table: &Table,
    data: &Json,
    value_filter: &dyn FieldPredicate,
    where_filter: &dyn FieldPredicate,
) -> ModelResult<Update> {
    let values = match data.get("values") {
        Some(Json::Object(values)) if !values.is_empty() => values,
        _ => return Err(ModelError::NoValues),
    };

    let assignments = compile_assignments(table, values, value_filter)?;
    if assignments.is_empty() {
        return Err(ModelError::NoValues);
    }

    let filter = data
        .get("where")
        .map(FilterDocument::from_json)
        .and_then(|doc| compile_where(table, &doc, where_filter));
    if filter.is_none() {
        tracing::warn!("update on `{}` has no condition and changes every row", table.name);
    }

    Ok(Update {
        table: table.name.clone(),
        assignments,
        filter,
    })
}

fn compile_assignments(
    table: &Table,
    values: &Map<String, Json>,
    filter: &dyn FieldPredicate,
) -> ModelResult<Vec<(String, Expr)>> {
    let mut assignments = Vec::with_capacity(values.len());
    for (key, val) in values {
        if !table.has_column(key) || !filter.accepts(key) {
            continue;
        }
        let expr = match val {
            Json::String(s) => assignment_value(key, s)?,
            other => Expr::Literal(Value::scalar_from_json(other)),
        };
        assignments.push((key.clone(), expr));
    }
    Ok(assignments)
}

/// `$bind.name` → placeholder, `$incr.n` → `column + n`, else a literal.
fn assignment_value(column: &str, value: &str) -> ModelResult<Expr> {
    if let Some(name) = value.strip_prefix(BIND_PREFIX) {
        return Ok(Expr::Param(Param::scalar(name)));
    }
    if let Some(delta) = value.strip_prefix(INCR_PREFIX) {
        let delta: i64 = delta
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidIncrement(value.to_string()))?;
        let (op, amount) = if delta < 0 {
            let amount = delta
                .checked_abs()
                .ok_or_else(|| ModelError::InvalidIncrement(value.to_string()))?;
            (BinaryOp::Sub, amount)
        } else {
            (BinaryOp::Add, delta)
        };
        return Ok(Expr::Binary {
            left: Box::new(Expr::column(column)),
            op,
            right: Box::new(Expr::literal(amount)),
        });
    }
    Ok(Expr::literal(value))
}
