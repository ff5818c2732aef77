//! SQL transpiler for statement ASTs.
//!
//! Two renderings are offered. [`ToSql::to_sql`] writes literals inline and
//! shows named placeholders as `:name`; it is meant for display. Use
//! [`ToSql::to_bound`] to execute: every value becomes a positional
//! parameter of the target dialect.

pub mod conditions;
pub mod dialect;
pub mod dml;
pub mod expr;
pub mod params;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use crate::ast::{Condition, Delete, Expr, Insert, Select, Statement, Update};
use crate::error::ModelResult;

pub use dialect::Dialect;
pub use params::{bindings_from_json, BoundQuery, Bindings, ParamContext};
pub use traits::{escape_identifier, SqlGenerator};

/// The inserts `dialect` needs to run `insert`, see [`dml::insert::split_for`].
pub fn insert_batches(insert: &Insert, dialect: Dialect) -> Vec<Insert> {
    dml::insert::split_for(insert, dialect.generator().as_ref())
}

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Render with the generator and parameter context given.
    fn render(&self, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String;

    /// Convert this node to a SQL string using default dialect.
    fn to_sql(&self) -> String {
        self.to_sql_with_dialect(Dialect::default())
    }

    /// Convert this node to a SQL string with specific dialect.
    fn to_sql_with_dialect(&self, dialect: Dialect) -> String {
        let generator = dialect.generator();
        self.render(generator.as_ref(), &mut ParamContext::inline())
    }

    /// Convert this node to parameterized SQL, resolving named placeholders
    /// from `bindings`.
    fn to_bound(&self, dialect: Dialect, bindings: &Bindings) -> ModelResult<BoundQuery> {
        let generator = dialect.generator();
        let mut ctx = ParamContext::bound(bindings);
        let sql = self.render(generator.as_ref(), &mut ctx);
        let params = ctx.finish()?;
        Ok(BoundQuery { sql, params })
    }
}

impl ToSql for Select {
    fn render(&self, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
        dml::select::build_select(self, generator, ctx)
    }
}

impl ToSql for Insert {
    fn render(&self, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
        dml::insert::build_insert(self, generator, ctx)
    }
}

impl ToSql for Update {
    fn render(&self, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
        dml::update::build_update(self, generator, ctx)
    }
}

impl ToSql for Delete {
    fn render(&self, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
        dml::delete::build_delete(self, generator, ctx)
    }
}

impl ToSql for Statement {
    fn render(&self, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
        match self {
            Statement::Select(s) => s.render(generator, ctx),
            Statement::Insert(s) => s.render(generator, ctx),
            Statement::Update(s) => s.render(generator, ctx),
            Statement::Delete(s) => s.render(generator, ctx),
        }
    }
}

impl ToSql for Condition {
    fn render(&self, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
        conditions::render_condition(self, generator, ctx)
    }
}

impl ToSql for Expr {
    fn render(&self, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
        expr::render_expr(self, generator, ctx)
    }
}
