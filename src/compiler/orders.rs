//! ORDER BY / GROUP BY tokens.

use crate::access::FieldPredicate;
use crate::ast::{Expr, OrderItem};
use crate::schema::Table;

/// Resolve a bare token.
///
/// A token naming a column, in any letter case and optionally qualified
/// with the table name, is that column and must pass the predicate.
/// Anything else is treated as an identifier the statement defines itself,
/// such as a projection label.
fn resolve(table: &Table, token: &str, filter: &dyn FieldPredicate) -> Option<Expr> {
    if token.is_empty() {
        return None;
    }
    let name = match token.rsplit_once('.') {
        Some((_, name)) => name,
        None => token,
    };
    match table.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name)) {
        Some(column) if filter.accepts(&column.name) => Some(Expr::column(column.name.as_str())),
        Some(column) => {
            tracing::warn!("`{}` refers to column `{}` which is not allowed here, dropped", token, column.name);
            None
        }
        None => Some(Expr::Identifier(token.to_string())),
    }
}

/// `["-create_time", "id"]` → `create_time DESC, id ASC`. `None` when empty.
pub fn compile_orders(table: &Table, orders: &[String], filter: &dyn FieldPredicate) -> Option<Vec<OrderItem>> {
    let items: Vec<OrderItem> = orders
        .iter()
        .filter_map(|token| match token.strip_prefix('-') {
            Some(name) => resolve(table, name, filter).map(OrderItem::desc),
            None => resolve(table, token, filter).map(OrderItem::asc),
        })
        .collect();
    if items.is_empty() { None } else { Some(items) }
}

pub fn compile_group(table: &Table, group: &[String], filter: &dyn FieldPredicate) -> Option<Vec<Expr>> {
    let items: Vec<Expr> = group.iter().filter_map(|token| resolve(table, token, filter)).collect();
    if items.is_empty() { None } else { Some(items) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::FieldFilter;

    fn users() -> Table {
        Table::with_columns("users", ["id", "name", "password"])
    }

    fn names(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_orders_with_descending_marker() {
        let orders = compile_orders(&users(), &names(&["-id", "name"]), &FieldFilter::allow_all());
        assert_eq!(
            orders,
            Some(vec![OrderItem::desc(Expr::column("id")), OrderItem::asc(Expr::column("name"))])
        );
    }

    #[test]
    fn test_unknown_token_passes_through_as_identifier() {
        let orders = compile_orders(&users(), &names(&["-total"]), &FieldFilter::allow_all());
        assert_eq!(orders, Some(vec![OrderItem::desc(Expr::Identifier("total".into()))]));
    }

    #[test]
    fn test_disallowed_column_dropped() {
        let filter = FieldFilter::blocking(["password"]);
        assert_eq!(compile_orders(&users(), &names(&["-password"]), &filter), None);
        assert_eq!(compile_group(&users(), &names(&["password", ""]), &filter), None);
    }

    #[test]
    fn test_disallowed_column_in_other_spellings_dropped() {
        let filter = FieldFilter::blocking(["password"]);
        let tokens = names(&["-PASSWORD", "users.password", "-Users.Password", "x.password"]);
        assert_eq!(compile_orders(&users(), &tokens, &filter), None);
        assert_eq!(compile_group(&users(), &names(&["PassWord", "users.password"]), &filter), None);
    }

    #[test]
    fn test_other_spellings_resolve_to_the_column() {
        assert_eq!(
            compile_orders(&users(), &names(&["-NAME", "users.id"]), &FieldFilter::allow_all()),
            Some(vec![OrderItem::desc(Expr::column("name")), OrderItem::asc(Expr::column("id"))])
        );
    }

    #[test]
    fn test_group_ignores_marker_semantics() {
        assert_eq!(
            compile_group(&users(), &names(&["name", "day"]), &FieldFilter::allow_all()),
            Some(vec![Expr::column("name"), Expr::Identifier("day".into())])
        );
    }
}
