//! SELECT statement builder.

use crate::access::FieldPredicate;
use crate::ast::{Expr, Select, SelectPage, SelectPlan};
use crate::compiler::conditions::compile_where;
use crate::compiler::keys::compile_keys;
use crate::compiler::orders::{compile_group, compile_orders};
use crate::document::SelectSpec;
use crate::error::{ModelError, ModelResult};
use crate::schema::Table;

/// Label of the count column in a paginated select's companion statement.
pub const COUNT_LABEL: &str = "_count";

/// Build a select, or a select plus its count statement when paginated.
///
/// Without `keys` the projection is every allowed column in declaration
/// order.
pub fn build_select(table: &Table, spec: &SelectSpec, filter: &dyn FieldPredicate) -> ModelResult<SelectPlan> {
    let columns = match &spec.keys {
        Some(keys) => compile_keys(table, keys, filter)?,
        None => table
            .column_names()
            .filter(|name| filter.accepts(name))
            .map(Expr::column)
            .collect(),
    };
    if columns.is_empty() {
        return Err(ModelError::EmptyProjection(table.name.clone()));
    }

    let mut select = Select::new(table.name.as_str(), columns);
    select.filter = compile_where(table, &spec.filter, filter);
    if let Some(group) = spec.group.as_deref().and_then(|g| compile_group(table, g, filter)) {
        select.group_by = group;
    }
    if let Some(orders) = spec.orders.as_deref().and_then(|o| compile_orders(table, o, filter)) {
        select.order_by = orders;
    }

    let Some(page) = spec.limit else {
        return Ok(SelectPlan::Single(select));
    };

    let first = table
        .first_column()
        .ok_or_else(|| ModelError::EmptyProjection(table.name.clone()))?;
    let mut count = Select::new(
        table.name.as_str(),
        vec![Expr::call("count", vec![Expr::column(first.name.as_str())]).alias(COUNT_LABEL)],
    );
    count.filter = select.filter.clone();

    select.offset = Some(page.offset);
    select.limit = Some(page.limit);
    Ok(SelectPlan::Paged(SelectPage { select, count }))
}
