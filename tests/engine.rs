//! Runs compiled requests against an in-memory SQLite database.

use pretty_assertions::assert_eq;
use restmodel::prelude::*;
use serde_json::{json, Value as Json};

const CONFIG: &str = r#"
    [database]
    url = "sqlite::memory:"
    max_connections = 1

    [[tables]]
    name = "author"
    columns = [{ name = "id", primary_key = true }, { name = "name" }, { name = "secret" }]

    [[tables]]
    name = "book"
    columns = [{ name = "id", primary_key = true }, { name = "author_id" }, { name = "title" }, { name = "stock" }]

    [access.author]
    select = { block = ["secret"] }

    [access.book]
    update = { allow = ["stock"] }
    update_where = { allow = ["id", "author_id"] }
"#;

struct Fixture {
    config: Config,
    registry: SchemaRegistry,
    db: Database,
}

impl Fixture {
    async fn new() -> ModelResult<Self> {
        let config = Config::from_toml(CONFIG)?;
        let registry = config.registry()?;
        let db = Database::connect_with(&config.database).await?;
        db.execute_raw("CREATE TABLE author (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, secret TEXT)")
            .await?;
        db.execute_raw(
            "CREATE TABLE book (id INTEGER PRIMARY KEY AUTOINCREMENT, author_id INTEGER, title TEXT, stock INTEGER NOT NULL DEFAULT 0)",
        )
        .await?;
        Ok(Self { config, registry, db })
    }

    async fn run(&self, table: &str, action: Action, body: Json, bindings: &Bindings) -> ModelResult<Json> {
        let compiled = compile(self.registry.table(table)?, &self.config.access(table), action, &body)?;
        self.db.run(&compiled, bindings).await
    }
}

#[tokio::test]
async fn test_dependent_inserts_through_row_cache() -> ModelResult<()> {
    let fx = Fixture::new().await?;
    let none = Bindings::new();

    let author = fx
        .run("author", Action::Insert, json!({"name": "ann", "secret": "s"}), &none)
        .await?;
    let mut cache = RowCache::new();
    let mut record = serde_json::Map::new();
    record.insert("id".to_string(), author["last_insert_id"].clone());
    cache.insert_record("author", record);

    let books = inject(
        &json!([
            {"author_id": "$author.id", "title": "one", "stock": 0},
            {"author_id": "$author.id", "title": "two", "stock": 4},
        ]),
        &cache,
    );
    let inserted = fx.run("book", Action::Insert, books, &none).await?;
    assert_eq!(inserted["rows_affected"], json!(2));

    let rows = fx
        .run(
            "book",
            Action::Select,
            json!({"keys": ["title", "stock"], "where": {"author_id": author["last_insert_id"].clone()}, "orders": ["title"]}),
            &none,
        )
        .await?;
    assert_eq!(rows, json!([{"title": "one", "stock": 0}, {"title": "two", "stock": 4}]));
    Ok(())
}

#[tokio::test]
async fn test_blocked_column_never_leaves_the_database() -> ModelResult<()> {
    let fx = Fixture::new().await?;
    let none = Bindings::new();
    fx.run("author", Action::Insert, json!({"name": "ann", "secret": "s"}), &none)
        .await?;

    let rows = fx.run("author", Action::Select, Json::Null, &none).await?;
    assert_eq!(rows, json!([{"id": 1, "name": "ann"}]));
    Ok(())
}

#[tokio::test]
async fn test_update_rules_and_bound_values() -> ModelResult<()> {
    let fx = Fixture::new().await?;
    let none = Bindings::new();
    fx.run(
        "book",
        Action::Insert,
        json!([{"author_id": 1, "title": "a"}, {"author_id": 1, "title": "b"}, {"author_id": 2, "title": "c"}]),
        &none,
    )
    .await?;

    // title is not updatable and is dropped; stock comes from a binding
    let bindings = Bindings::from([("stock".to_string(), Value::Int(7))]);
    let updated = fx
        .run(
            "book",
            Action::Update,
            json!({"values": {"stock": "$bind.stock", "title": "x"}, "where": {"author_id": 1}}),
            &bindings,
        )
        .await?;
    assert_eq!(updated[0]["rows_affected"], json!(2));

    let page = fx
        .run(
            "book",
            Action::Select,
            json!({"keys": ["title", "stock"], "where": {"stock": {"opt": "$gte", "val": 7}}, "orders": ["-title"], "limit": [0, 1]}),
            &none,
        )
        .await?;
    assert_eq!(page["rows"], json!([{"title": "b", "stock": 7}]));
    assert_eq!(page["total"], json!(2));
    Ok(())
}

#[tokio::test]
async fn test_update_with_only_blocked_values_is_rejected() -> ModelResult<()> {
    let fx = Fixture::new().await?;
    let err = fx
        .run("book", Action::Update, json!({"values": {"title": "x"}, "where": {"id": 1}}), &Bindings::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::NoValues));
    Ok(())
}
