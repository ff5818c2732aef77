//! DELETE statement builder.

use crate::access::FieldPredicate;
use crate::ast::Delete;
use crate::compiler::conditions::compile_where;
use crate::document::FilterDocument;
use crate::schema::Table;

/// Build a DELETE. A filter that compiles to nothing deletes every row.
pub fn build_delete(table: &Table, doc: &FilterDocument, filter: &dyn FieldPredicate) -> Delete {
    let filter = compile_where(table, doc, filter);
    if filter.is_none() {
        tracing::warn!("delete on `{}` has no condition and removes every row", table.name);
    }
    Delete {
        table: table.name.clone(),
        filter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::FieldFilter;
    use crate::ast::{Condition, Expr, Operator};
    use serde_json::json;

    fn users() -> Table {
        Table::with_columns("users", ["id", "name"])
    }

    #[test]
    fn test_delete_with_filter() {
        let doc = FilterDocument::from_json(&json!({"id": {"opt": "$lt", "val": 10}}));
        let delete = build_delete(&users(), &doc, &FieldFilter::allow_all());
        assert_eq!(
            delete.filter,
            Some(Condition::compare(Expr::column("id"), Operator::Lt, Expr::literal(10)))
        );
    }

    #[test]
    fn test_unconditional_delete() {
        let delete = build_delete(&users(), &FilterDocument::default(), &FieldFilter::allow_all());
        assert_eq!(delete.table, "users");
        assert_eq!(delete.filter, None);

        // every field filtered out is also unconditional
        let doc = FilterDocument::from_json(&json!({"name": "x"}));
        assert_eq!(build_delete(&users(), &doc, &FieldFilter::allowing(["id"])).filter, None);
    }
}
