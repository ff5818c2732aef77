//! Request documents to statement ASTs.
//!
//! The compiler is pure: it reads a [`Table`], the request JSON and the
//! field predicates, and returns freshly built statements. Nothing here
//! performs I/O or keeps state between calls.

pub mod args;
pub mod conditions;
pub mod dml;
pub mod functions;
pub mod keys;
pub mod orders;

use serde::Deserialize;
use serde_json::Value as Json;

use crate::access::TableAccess;
use crate::ast::{Action, Delete, Insert, SelectPlan, Statement, Update};
use crate::document::{FilterDocument, SelectSpec};
use crate::error::ModelResult;
use crate::schema::Table;
use crate::transpiler::{insert_batches, Dialect};

pub use conditions::{compile_document, compile_where};
pub use dml::{build_delete, build_insert, build_select, build_update, COUNT_LABEL};
pub use keys::compile_keys;
pub use orders::{compile_group, compile_orders};

/// Output of [`compile`].
#[derive(Debug, Clone, PartialEq)]
pub enum Compiled {
    Select(SelectPlan),
    Insert(Insert),
    /// One statement per update document
    Update(Vec<Update>),
    Delete(Delete),
}

impl Compiled {
    /// Flatten into executable statements, data select before count.
    pub fn into_statements(self) -> Vec<Statement> {
        match self {
            Compiled::Select(SelectPlan::Single(select)) => vec![select.into()],
            Compiled::Select(SelectPlan::Paged(page)) => vec![page.select.into(), page.count.into()],
            Compiled::Insert(insert) => vec![insert.into()],
            Compiled::Update(updates) => updates.into_iter().map(Statement::from).collect(),
            Compiled::Delete(delete) => vec![delete.into()],
        }
    }

    /// Like [`Compiled::into_statements`], with inserts split the way
    /// `dialect` needs them.
    pub fn into_statements_for(self, dialect: Dialect) -> Vec<Statement> {
        match self {
            Compiled::Insert(insert) => insert_batches(&insert, dialect)
                .into_iter()
                .map(Statement::from)
                .collect(),
            other => other.into_statements(),
        }
    }
}

/// Compile one request against `table` under the table's access rules.
///
/// Body shapes per action:
/// - select: `{where, keys, orders, group, limit}`
/// - insert: a record or a list of records
/// - update: `{values, where}` or a list of those
/// - delete: `{where}`, or the filter document itself
pub fn compile(table: &Table, access: &TableAccess, action: Action, body: &Json) -> ModelResult<Compiled> {
    let compiled = match action {
        Action::Select => {
            let spec = if body.is_null() {
                SelectSpec::default()
            } else {
                SelectSpec::deserialize(body)?
            };
            Compiled::Select(build_select(table, &spec, &access.select.filter())?)
        }
        Action::Insert => Compiled::Insert(build_insert(table, body, &access.insert.filter())?),
        Action::Update => Compiled::Update(build_update(
            table,
            body,
            &access.update.filter(),
            &access.update_where.filter(),
        )?),
        Action::Delete => {
            let doc = FilterDocument::from_json(body.get("where").unwrap_or(body));
            Compiled::Delete(build_delete(table, &doc, &access.delete.filter()))
        }
    };
    tracing::debug!("compiled {} on `{}`", action, table.name);
    Ok(compiled)
}
