//! Transpiler test modules.
//!
//! Tests are organized by category:
//! - `core`: SELECT, UPDATE, DELETE, INSERT rendered inline
//! - `dialects`: quoting, literals and function rewrites per dialect
//! - `bound`: parameterized rendering and placeholder resolution

mod dialects;

use serde_json::Value as Json;

use crate::access::FieldFilter;
use crate::ast::{Select, SelectPage, SelectPlan};
use crate::compiler::build_select;
use crate::schema::Table;

fn users() -> Table {
    Table::with_columns("users", ["id", "name", "age", "email", "create_time"])
}

fn plan(table: &Table, json: Json) -> SelectPlan {
    build_select(table, &serde_json::from_value(json).unwrap(), &FieldFilter::allow_all()).unwrap()
}

fn select(json: Json) -> Select {
    match plan(&users(), json) {
        SelectPlan::Single(select) => select,
        SelectPlan::Paged(page) => page.select,
    }
}

fn page(json: Json) -> SelectPage {
    match plan(&users(), json) {
        SelectPlan::Paged(page) => page,
        SelectPlan::Single(_) => panic!("expected a paged select"),
    }
}
