//! INSERT SQL generation.

use crate::ast::Insert;
use crate::transpiler::expr::render_list;
use crate::transpiler::params::ParamContext;
use crate::transpiler::traits::SqlGenerator;

/// The inserts to run for `insert`.
///
/// Where rows cannot carry `DEFAULT`, the batch is split by the columns each
/// row provides.
pub fn split_for(insert: &Insert, generator: &dyn SqlGenerator) -> Vec<Insert> {
    if generator.default_cells() || !insert.has_defaults() {
        vec![insert.clone()]
    } else {
        insert.split_by_columns()
    }
}

/// Generate INSERT SQL, one VALUES tuple per row.
pub fn build_insert(insert: &Insert, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
    let mut sql = String::from("INSERT INTO ");
    sql.push_str(&generator.quote_identifier(&insert.table));

    if insert.columns.is_empty() {
        sql.push_str(&generator.empty_insert(insert.rows.len()));
        return sql;
    }

    let cols: Vec<String> = insert.columns.iter().map(|c| generator.quote_identifier(c)).collect();
    sql.push_str(" (");
    sql.push_str(&cols.join(", "));
    sql.push(')');

    let rows: Vec<String> = insert
        .rows
        .iter()
        .map(|row| format!("({})", render_list(row, generator, ctx)))
        .collect();
    sql.push_str(" VALUES ");
    sql.push_str(&rows.join(", "));
    sql
}
