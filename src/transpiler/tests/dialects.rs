//! SQL Dialect tests (MySQL, SQLite, Postgres).

use serde_json::json;

use super::{select, users};
use crate::access::FieldFilter;
use crate::compiler::build_insert;
use crate::transpiler::{insert_batches, Dialect, ToSql};

const DAY_KEY: &str = "from_unixtime($create_time, '%Y-%m-%d %H:%i'): day";

#[test]
fn test_mysql_dialect() {
    let select = select(json!({"keys": ["count($id): total"], "where": {"name": "a", "age": false}}));
    assert_eq!(
        select.to_sql_with_dialect(Dialect::MySQL),
        "SELECT count(id) AS total FROM users WHERE name = 'a' AND age = FALSE"
    );
}

#[test]
fn test_sqlite_dialect() {
    let select = select(json!({"keys": ["id"], "where": {"age": true}}));
    assert_eq!(select.to_sql_with_dialect(Dialect::SQLite), "SELECT id FROM users WHERE age = 1");
}

#[test]
fn test_from_unixtime_per_dialect() {
    let select = select(json!({"keys": [DAY_KEY]}));
    assert_eq!(
        select.to_sql_with_dialect(Dialect::MySQL),
        "SELECT from_unixtime(create_time, '%Y-%m-%d %H:%i') AS day FROM users"
    );
    assert_eq!(
        select.to_sql_with_dialect(Dialect::SQLite),
        "SELECT strftime('%Y-%m-%d %H:%M', create_time, 'unixepoch') AS day FROM users"
    );
    assert_eq!(
        select.to_sql_with_dialect(Dialect::Postgres),
        "SELECT to_char(to_timestamp(create_time), 'YYYY-MM-DD HH24:MI') AS day FROM users"
    );
}

#[test]
fn test_date_parts_and_group_concat() {
    let select = select(json!({"keys": ["year($create_time): y", "group_concat($name)"]}));
    assert_eq!(
        select.to_sql_with_dialect(Dialect::Postgres),
        "SELECT date_part('year', create_time) AS y, string_agg(name, ',') FROM users"
    );
    assert_eq!(
        select.to_sql_with_dialect(Dialect::SQLite),
        "SELECT strftime('%Y', create_time) AS y, group_concat(name) FROM users"
    );
}

#[test]
fn test_identifier_quoting_per_dialect() {
    let select = select(json!({"keys": ["count($id): order"]}));
    assert_eq!(
        select.to_sql_with_dialect(Dialect::MySQL),
        "SELECT count(id) AS `order` FROM users"
    );
    assert_eq!(
        select.to_sql_with_dialect(Dialect::SQLite),
        "SELECT count(id) AS \"order\" FROM users"
    );
}

#[test]
fn test_insert_without_columns() {
    let insert = build_insert(&users(), &json!({"nope": 1}), &FieldFilter::allow_all()).unwrap();
    assert_eq!(insert.to_sql_with_dialect(Dialect::Postgres), "INSERT INTO users DEFAULT VALUES");
    assert_eq!(insert.to_sql_with_dialect(Dialect::MySQL), "INSERT INTO users () VALUES ()");
}

#[test]
fn test_insert_with_missing_cells() {
    let insert = build_insert(
        &users(),
        &json!([{"name": "d", "age": 1}, {"name": "e"}, {}, {"age": 2, "name": "f"}]),
        &FieldFilter::allow_all(),
    )
    .unwrap();
    assert_eq!(
        insert.to_sql_with_dialect(Dialect::MySQL),
        "INSERT INTO users (name, age) VALUES ('d', 1), ('e', DEFAULT), (DEFAULT, DEFAULT), ('f', 2)"
    );
    assert_eq!(insert_batches(&insert, Dialect::Postgres), vec![insert.clone()]);

    let sqlite: Vec<String> = insert_batches(&insert, Dialect::SQLite)
        .iter()
        .map(|batch| batch.to_sql_with_dialect(Dialect::SQLite))
        .collect();
    assert_eq!(
        sqlite,
        vec![
            "INSERT INTO users (name, age) VALUES ('d', 1), ('f', 2)",
            "INSERT INTO users (name) VALUES ('e')",
            "INSERT INTO users DEFAULT VALUES",
        ]
    );
}
