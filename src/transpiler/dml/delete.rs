//! DELETE SQL generation.

use crate::ast::Delete;
use crate::transpiler::conditions::render_condition;
use crate::transpiler::params::ParamContext;
use crate::transpiler::traits::SqlGenerator;

/// Generate DELETE SQL.
pub fn build_delete(delete: &Delete, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
    let mut sql = String::from("DELETE FROM ");
    sql.push_str(&generator.quote_identifier(&delete.table));

    if let Some(filter) = &delete.filter {
        sql.push_str(" WHERE ");
        sql.push_str(&render_condition(filter, generator, ctx));
    }

    sql
}
