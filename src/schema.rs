//! Table schemas.
//!
//! A [`Table`] is the column registry the compilers resolve field names
//! against. Column order is the declaration order and drives the default
//! projection and the column counted by paginated selects.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Column definition in schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type", default)]
    pub col_type: Option<String>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            col_type: None,
            nullable: true,
            primary_key: false,
        }
    }
}

/// Table schema definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Shorthand for a table whose columns only carry names.
    pub fn with_columns<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, columns.into_iter().map(Column::new).collect())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// The first declared column.
    pub fn first_column(&self) -> Option<&Column> {
        self.columns.first()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Schema file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// Registry of known tables
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    tables: HashMap<String, Table>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load table definitions from a TOML file.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> ModelResult<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ModelError::Config(format!("Failed to read schema {}: {}", path.display(), e)))?;
        let config: SchemaConfig = toml::from_str(&content)?;

        for table in config.tables {
            tracing::debug!("Loaded schema for table: {}", table.name);
            self.add_table(table);
        }

        tracing::info!("Loaded {} table schemas from {}", self.tables.len(), path.display());
        Ok(())
    }

    pub fn add_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn table(&self, name: &str) -> ModelResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| ModelError::UnknownTable(name.to_string()))
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<Table> for SchemaRegistry {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        let mut registry = Self::new();
        for table in iter {
            registry.add_table(table);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema_toml() {
        let config: SchemaConfig = toml::from_str(
            r#"
            [[tables]]
            name = "user"
            columns = [
                { name = "id", type = "integer", primary_key = true },
                { name = "account", type = "text" },
            ]
            "#,
        )
        .unwrap();
        let registry: SchemaRegistry = config.tables.into_iter().collect();
        let user = registry.table("user").unwrap();
        assert_eq!(user.column_names().collect::<Vec<_>>(), vec!["id", "account"]);
        assert!(user.column("id").unwrap().primary_key);
        assert_eq!(user.first_column().map(|c| c.name.as_str()), Some("id"));
    }

    #[test]
    fn test_unknown_table() {
        let registry = SchemaRegistry::new();
        assert!(matches!(registry.table("nope"), Err(ModelError::UnknownTable(_))));
    }
}
