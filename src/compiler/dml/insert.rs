//! INSERT statement builder.

use serde_json::{Map, Value as Json};

use crate::access::FieldPredicate;
use crate::ast::{Expr, Insert, Value};
use crate::error::{ModelError, ModelResult};
use crate::schema::Table;

/// Build an INSERT from one record or a list of records.
///
/// Keys that are not columns of `table` or fail `filter` are dropped from
/// every record. The column list is the union of the surviving keys in the
/// order they are first seen; cells a record does not provide are
/// [`Expr::Default`], so the column default applies.
pub fn build_insert(table: &Table, data: &Json, filter: &dyn FieldPredicate) -> ModelResult<Insert> {
    let records: Vec<&Map<String, Json>> = match data {
        Json::Object(record) => vec![record],
        Json::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Json::Object(record) => Some(record),
                other => {
                    tracing::warn!("insert record `{}` is not an object, skipped", other);
                    None
                }
            })
            .collect(),
        other => {
            tracing::warn!("insert data must be an object or a list, got `{}`", other);
            Vec::new()
        }
    };
    if records.is_empty() {
        return Err(ModelError::NoRecords);
    }

    let mut columns: Vec<String> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if columns.contains(key) || !filter.accepts(key) {
                continue;
            }
            if !table.has_column(key) {
                tracing::warn!("`{}` is not a column of `{}`, dropped from insert", key, table.name);
                continue;
            }
            columns.push(key.clone());
        }
    }

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|col| match record.get(col) {
                    Some(cell) => Expr::Literal(Value::scalar_from_json(cell)),
                    None => Expr::Default,
                })
                .collect()
        })
        .collect();

    Ok(Insert {
        table: table.name.clone(),
        columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::FieldFilter;
    use serde_json::json;

    fn users() -> Table {
        Table::with_columns("users", ["id", "name", "email", "role"])
    }

    #[test]
    fn test_single_record() {
        let insert = build_insert(&users(), &json!({"name": "a", "email": "a@x"}), &FieldFilter::allow_all()).unwrap();
        assert_eq!(insert.columns, vec!["name", "email"]);
        assert_eq!(insert.rows, vec![vec![Expr::literal("a"), Expr::literal("a@x")]]);
    }

    #[test]
    fn test_list_drops_same_keys_from_every_record() {
        let filter = FieldFilter::allowing(["name", "email"]);
        let insert = build_insert(
            &users(),
            &json!([{"name": "a", "role": "admin"}, {"name": "b", "email": "b@x", "role": "root"}]),
            &filter,
        )
        .unwrap();
        assert_eq!(insert.columns, vec!["name", "email"]);
        assert_eq!(
            insert.rows,
            vec![
                vec![Expr::literal("a"), Expr::Default],
                vec![Expr::literal("b"), Expr::literal("b@x")],
            ]
        );
    }

    #[test]
    fn test_unknown_keys_and_nested_values() {
        let insert = build_insert(&users(), &json!({"nope": 1, "name": {"first": "a"}}), &FieldFilter::allow_all()).unwrap();
        assert_eq!(insert.columns, vec!["name"]);
        assert_eq!(insert.rows, vec![vec![Expr::literal(r#"{"first":"a"}"#)]]);
    }

    #[test]
    fn test_no_records() {
        assert!(matches!(
            build_insert(&users(), &json!([]), &FieldFilter::allow_all()),
            Err(ModelError::NoRecords)
        ));
        assert!(build_insert(&users(), &json!("x"), &FieldFilter::allow_all()).is_err());
    }
}
