//! # restmodel
//!
//! Compile JSON request documents into parameterized SQL.
//!
//! A generic CRUD endpoint hands the compiler a table definition, the
//! request body and the table's access rules, and gets back statement ASTs
//! ready to render for PostgreSQL, MySQL or SQLite.
//!
//! ## Quick Example
//!
//! ```
//! use restmodel::prelude::*;
//! use serde_json::json;
//!
//! let users = Table::with_columns("users", ["id", "name", "age"]);
//! let body = json!({
//!     "where": {"$or": [{"age": {"opt": "$gte", "val": 18}}, {"name": "root"}]},
//!     "keys": ["id", "name"],
//! });
//! let compiled = compile(&users, &TableAccess::default(), Action::Select, &body).unwrap();
//! let sql = compiled.into_statements()[0].to_sql();
//! assert_eq!(sql, "SELECT id, name FROM users WHERE age >= 18 OR name = 'root'");
//! ```
//!
//! ## Filter operators
//!
//! | Code    | SQL                      |
//! |---------|--------------------------|
//! | `$te`   | `=` (default)            |
//! | `$ne`   | `!=`                     |
//! | `$lt`   | `<`, also `$lte` `$gt` `$gte` |
//! | `$like` | `LIKE`                   |
//! | `$in`   | `IN`, `$nin` for `NOT IN` |
//! | `$bind` | named placeholder        |
//! | `$raw`  | verbatim SQL fragment    |

pub mod access;
pub mod ast;
pub mod compiler;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod inject;
pub mod schema;
pub mod transpiler;

pub mod prelude {
    pub use crate::access::{AccessRule, FieldFilter, FieldPredicate, TableAccess};
    pub use crate::ast::*;
    pub use crate::compiler::{compile, Compiled};
    pub use crate::config::Config;
    pub use crate::document::{FilterDocument, Pagination, SelectSpec};
    pub use crate::engine::{Database, ExecOutcome, Page, Record};
    pub use crate::error::*;
    pub use crate::inject::{inject, resolve_reference, RowCache};
    pub use crate::schema::{Column, SchemaRegistry, Table};
    pub use crate::transpiler::{bindings_from_json, Bindings, BoundQuery, Dialect, ToSql};
}

pub use compiler::compile;
