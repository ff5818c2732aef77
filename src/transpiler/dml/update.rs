//! UPDATE SQL generation.

use crate::ast::Update;
use crate::transpiler::conditions::render_condition;
use crate::transpiler::expr::render_expr;
use crate::transpiler::params::ParamContext;
use crate::transpiler::traits::SqlGenerator;

/// Generate UPDATE SQL.
pub fn build_update(update: &Update, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
    let mut sql = String::from("UPDATE ");
    sql.push_str(&generator.quote_identifier(&update.table));

    let set_clauses: Vec<String> = update
        .assignments
        .iter()
        .map(|(col, expr)| {
            format!(
                "{} = {}",
                generator.quote_identifier(col),
                render_expr(expr, generator, ctx)
            )
        })
        .collect();
    sql.push_str(" SET ");
    sql.push_str(&set_clauses.join(", "));

    if let Some(filter) = &update.filter {
        sql.push_str(" WHERE ");
        sql.push_str(&render_condition(filter, generator, ctx));
    }

    sql
}
