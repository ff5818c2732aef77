//! End-to-end compilation through the public API.

use pretty_assertions::assert_eq;
use restmodel::compiler::compile_where;
use restmodel::prelude::*;
use serde_json::{json, Value as Json};

fn users() -> Table {
    Table::with_columns("users", ["id", "name", "age", "email", "visits", "create_time"])
}

fn sql(table: &Table, access: &TableAccess, action: Action, body: Json) -> Vec<String> {
    compile(table, access, action, &body)
        .expect("compile")
        .into_statements()
        .iter()
        .map(|stmt| stmt.to_sql())
        .collect()
}

fn rule(allow: &[&str]) -> AccessRule {
    AccessRule {
        allow: allow.iter().map(|s| s.to_string()).collect(),
        ..AccessRule::default()
    }
}

fn where_sql(filter: Json) -> Option<String> {
    compile_where(&users(), &FilterDocument::from_json(&filter), &FieldFilter::allow_all()).map(|c| c.to_sql())
}

#[test]
fn test_field_filter_combines_both_lists() {
    let block = ["a", "b"];
    let allow = ["c", "d", "e"];
    let filter = FieldFilter::new(Some(block), Some(allow));
    for field in ["a", "b", "c", "d", "e", "f"] {
        let expected = !block.contains(&field) && allow.contains(&field);
        assert_eq!(filter.allows(field), expected, "field {field}");
    }
    assert!(FieldFilter::new(None::<Vec<String>>, None::<Vec<String>>).allows("anything"));
}

#[test]
fn test_empty_documents_compile_to_nothing() {
    assert_eq!(where_sql(json!({})), None);
    assert_eq!(where_sql(json!({"$and": {}})), None);
    assert_eq!(where_sql(json!({"id": 1, "$and": {}})), Some("id = 1".to_string()));
}

#[test]
fn test_operator_object() {
    assert_eq!(where_sql(json!({"age": {"opt": "$gte", "val": 18}})), Some("age >= 18".to_string()));
    assert_eq!(where_sql(json!({"age": {"val": 18}})), Some("age = 18".to_string()));
    // no val, no predicate
    assert_eq!(where_sql(json!({"age": {"opt": "$gt"}})), None);
}

#[test]
fn test_or_of_and() {
    assert_eq!(
        where_sql(json!({"$or": [{"age": 1}, {"age": 2}]})),
        Some("age = 1 OR age = 2".to_string())
    );
    assert_eq!(
        where_sql(json!({"$or": [{"age": 1}, {"$and": {"name": "b", "email": "c"}}]})),
        Some("age = 1 OR (name = 'b' AND email = 'c')".to_string())
    );
}

#[test]
fn test_nested_bind_is_dropped() {
    let nested = json!({"id": {"opt": "$bind", "val": {"opt": "$bind", "val": "x"}}});
    assert_eq!(where_sql(nested), None);
}

#[test]
fn test_bind_with_unknown_inner_operator_is_dropped() {
    let filter = json!({"id": {"opt": "$bind", "val": {"opt": "$zz", "val": "x"}}});
    assert_eq!(where_sql(filter), None);
}

#[test]
fn test_integer_beyond_i64_stays_exact() {
    assert_eq!(
        where_sql(json!({"id": 18446744073709551615u64})),
        Some("id = '18446744073709551615'".to_string())
    );
}

#[test]
fn test_select_page_shares_where() {
    let statements = sql(
        &users(),
        &TableAccess::default(),
        Action::Select,
        json!({"keys": ["id", "name"], "where": {"age": {"opt": "$lt", "val": 30}}, "limit": [0, 10]}),
    );
    assert_eq!(
        statements,
        vec![
            "SELECT id, name FROM users WHERE age < 30 LIMIT 10 OFFSET 0".to_string(),
            "SELECT count(id) AS _count FROM users WHERE age < 30".to_string(),
        ]
    );
}

#[test]
fn test_projection_with_column_argument() {
    let statements = sql(
        &users(),
        &TableAccess::default(),
        Action::Select,
        json!({"keys": ["from_unixtime($create_time, '%Y-%m-%d')", "nosuchfn($id)", "$$x"]}),
    );
    assert_eq!(statements, vec!["SELECT from_unixtime(create_time, '%Y-%m-%d') FROM users".to_string()]);
}

#[test]
fn test_blocked_column_is_not_selected() {
    let access = TableAccess {
        select: AccessRule {
            block: vec!["email".to_string()],
            ..AccessRule::default()
        },
        ..TableAccess::default()
    };
    let statements = sql(&users(), &access, Action::Select, json!({"where": {"email": "x", "id": 1}}));
    assert_eq!(
        statements,
        vec!["SELECT id, name, age, visits, create_time FROM users WHERE id = 1".to_string()]
    );
}

#[test]
fn test_blocked_column_cannot_order_or_group() {
    let access = TableAccess {
        select: AccessRule {
            block: vec!["email".to_string()],
            ..AccessRule::default()
        },
        ..TableAccess::default()
    };
    let statements = sql(
        &users(),
        &access,
        Action::Select,
        json!({"keys": ["id"], "orders": ["-EMAIL", "users.email", "Id"], "group": ["Email"]}),
    );
    assert_eq!(statements, vec!["SELECT id FROM users ORDER BY id ASC".to_string()]);
}

#[test]
fn test_update_increments() {
    let statements = sql(
        &users(),
        &TableAccess::default(),
        Action::Update,
        json!([
            {"values": {"visits": "$incr.5"}, "where": {"id": 1}},
            {"values": {"visits": "$incr.-3"}, "where": {"id": 2}},
        ]),
    );
    assert_eq!(
        statements,
        vec![
            "UPDATE users SET visits = visits + 5 WHERE id = 1".to_string(),
            "UPDATE users SET visits = visits - 3 WHERE id = 2".to_string(),
        ]
    );
}

#[test]
fn test_update_without_values_fails_whole_batch() {
    let body = json!([{"values": {"name": "a"}}, {"where": {"id": 1}}, {"values": {"name": "b"}}]);
    let err = compile(&users(), &TableAccess::default(), Action::Update, &body).unwrap_err();
    assert!(matches!(err, ModelError::NoValues));

    let err = compile(&users(), &TableAccess::default(), Action::Update, &json!({"values": {}})).unwrap_err();
    assert!(matches!(err, ModelError::NoValues));
}

#[test]
fn test_update_where_uses_its_own_rule() {
    let access = TableAccess {
        update_where: rule(&["id"]),
        ..TableAccess::default()
    };
    let statements = sql(
        &users(),
        &access,
        Action::Update,
        json!({"values": {"name": "n"}, "where": {"id": 3, "email": "x"}}),
    );
    assert_eq!(statements, vec!["UPDATE users SET name = 'n' WHERE id = 3".to_string()]);
}

#[test]
fn test_update_where_filtered_to_nothing() {
    let access = TableAccess {
        update_where: rule(&["id"]),
        ..TableAccess::default()
    };
    let statements = sql(
        &users(),
        &access,
        Action::Update,
        json!({"values": {"name": "n"}, "where": {"email": "x"}}),
    );
    assert_eq!(statements, vec!["UPDATE users SET name = 'n'".to_string()]);
}

#[test]
fn test_insert_drops_disallowed_keys_from_every_record() {
    let access = TableAccess {
        insert: rule(&["name", "age"]),
        ..TableAccess::default()
    };
    let statements = sql(
        &users(),
        &access,
        Action::Insert,
        json!([{"id": 1, "name": "a", "age": 2}, {"id": 2, "name": "b", "age": 3}]),
    );
    assert_eq!(
        statements,
        vec!["INSERT INTO users (name, age) VALUES ('a', 2), ('b', 3)".to_string()]
    );
}

#[test]
fn test_unconditional_delete() {
    let statements = sql(&users(), &TableAccess::default(), Action::Delete, json!({}));
    assert_eq!(statements, vec!["DELETE FROM users".to_string()]);
}

#[test]
fn test_resolve_reference() {
    let cache = RowCache::from_json(&json!({"user": [{"name": "x"}]}));
    assert_eq!(resolve_reference("$user.0.name", &cache), json!("x"));
    assert_eq!(resolve_reference("$missing.name", &RowCache::new()), json!("$missing.name"));
}

#[test]
fn test_injected_parent_id() {
    let cache = RowCache::from_json(&json!({"users": {"id": 42}}));
    let body = inject(&json!({"values": {"visits": 0}, "where": {"id": "$users.id"}}), &cache);
    let statements = sql(&users(), &TableAccess::default(), Action::Update, body);
    assert_eq!(statements, vec!["UPDATE users SET visits = 0 WHERE id = 42".to_string()]);
}
