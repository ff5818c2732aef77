//! Cross-statement value injection.
//!
//! A request made of several statements can refer to rows produced by an
//! earlier one with `$table.field` or `$table.index.field`. The rows are kept
//! in a [`RowCache`] and references are resolved against it before the next
//! document is compiled.

use std::collections::HashMap;

use serde_json::{Map, Value as Json};

/// Rows cached for one table.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedRows {
    Record(Map<String, Json>),
    Records(Vec<Map<String, Json>>),
}

/// Table name to the rows it produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowCache {
    tables: HashMap<String, CachedRows>,
}

impl RowCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache from `{table: record | [record, ...]}`. Other shapes are skipped.
    pub fn from_json(json: &Json) -> Self {
        let mut cache = Self::new();
        if let Json::Object(tables) = json {
            for (table, rows) in tables {
                match rows {
                    Json::Object(record) => cache.insert_record(table.as_str(), record.clone()),
                    Json::Array(items) => cache.insert_records(
                        table.as_str(),
                        items.iter().filter_map(|item| item.as_object().cloned()).collect(),
                    ),
                    other => tracing::warn!("cached rows for `{}` must be an object or a list, got `{}`", table, other),
                }
            }
        }
        cache
    }

    pub fn insert_record(&mut self, table: impl Into<String>, record: Map<String, Json>) {
        self.tables.insert(table.into(), CachedRows::Record(record));
    }

    pub fn insert_records(&mut self, table: impl Into<String>, records: Vec<Map<String, Json>>) {
        self.tables.insert(table.into(), CachedRows::Records(records));
    }

    pub fn get(&self, table: &str) -> Option<&CachedRows> {
        self.tables.get(table)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn lookup(&self, table: &str, index: usize, field: &str) -> Option<&Json> {
        match self.get(table)? {
            CachedRows::Records(rows) => rows.get(index)?.get(field),
            CachedRows::Record(record) => record.get(field),
        }
    }
}

/// Resolve `$table[.index].field` against `cache`.
///
/// The index defaults to 0 and is ignored for a single cached record. Any
/// failure returns the reference unchanged, so literal strings that merely
/// start with `$` pass through.
pub fn resolve_reference(reference: &str, cache: &RowCache) -> Json {
    resolve(reference, cache)
        .cloned()
        .unwrap_or_else(|| Json::String(reference.to_string()))
}

fn resolve<'a>(reference: &str, cache: &'a RowCache) -> Option<&'a Json> {
    let path = reference.strip_prefix('$')?;
    let parts: Vec<&str> = path.split('.').collect();
    let (table, index, field) = match parts.as_slice() {
        [table, field] => (*table, 0, *field),
        [table, index, field] => (*table, index.parse().ok()?, *field),
        _ => return None,
    };
    cache.lookup(table, index, field)
}

/// Replace every resolvable reference string inside `value`.
pub fn inject(value: &Json, cache: &RowCache) -> Json {
    match value {
        Json::String(s) if s.starts_with('$') => resolve_reference(s, cache),
        Json::Array(items) => Json::Array(items.iter().map(|item| inject(item, cache)).collect()),
        Json::Object(map) => Json::Object(map.iter().map(|(k, v)| (k.clone(), inject(v, cache))).collect()),
        other => other.clone(),
    }
}
