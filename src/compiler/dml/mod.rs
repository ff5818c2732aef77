//! Statement builders.
//!
//! Each builder resolves request documents against a [`Table`](crate::schema::Table)
//! and a field predicate and returns an AST statement ready for rendering.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use delete::build_delete;
pub use insert::build_insert;
pub use select::{build_select, COUNT_LABEL};
pub use update::build_update;
