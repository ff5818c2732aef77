//! SELECT SQL generation.

use crate::ast::Select;
use crate::transpiler::conditions::render_condition;
use crate::transpiler::expr::{render_list, render_order};
use crate::transpiler::params::ParamContext;
use crate::transpiler::traits::SqlGenerator;

/// Generate SELECT SQL.
pub fn build_select(select: &Select, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
    let mut sql = String::from("SELECT ");
    if select.columns.is_empty() {
        sql.push('*');
    } else {
        sql.push_str(&render_list(&select.columns, generator, ctx));
    }

    sql.push_str(" FROM ");
    sql.push_str(&generator.quote_identifier(&select.table));

    if let Some(filter) = &select.filter {
        sql.push_str(" WHERE ");
        sql.push_str(&render_condition(filter, generator, ctx));
    }

    if !select.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&render_list(&select.group_by, generator, ctx));
    }

    if !select.order_by.is_empty() {
        let orders: Vec<String> = select
            .order_by
            .iter()
            .map(|item| render_order(item, generator, ctx))
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&orders.join(", "));
    }

    sql.push_str(&generator.limit_offset(select.limit, select.offset));
    sql
}
