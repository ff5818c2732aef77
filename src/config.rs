//! Configuration.
//!
//! ```toml
//! schema = "tables.toml"          # optional, extra [[tables]]
//!
//! [database]
//! url = "sqlite::memory:"
//! max_connections = 5
//! dialect = "sqlite"              # optional, inferred from url
//!
//! [log]
//! filter = "restmodel=debug"
//!
//! [[tables]]
//! name = "user"
//! columns = [{ name = "id", primary_key = true }, { name = "name" }]
//!
//! [access.user]
//! select = { block = ["password"] }
//! update_where = { allow = ["id"] }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::access::TableAccess;
use crate::error::{ModelError, ModelResult};
use crate::schema::{SchemaRegistry, Table};
use crate::transpiler::Dialect;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "RESTMODEL_CONFIG";
/// Environment variable overriding `database.url`.
pub const DATABASE_URL_ENV: &str = "RESTMODEL_DATABASE_URL";

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub log: LogConfig,

    /// Path to an additional schema file
    #[serde(default)]
    pub schema: Option<PathBuf>,

    #[serde(default)]
    pub tables: Vec<Table>,

    /// Access rules by table name
    #[serde(default)]
    pub access: HashMap<String, TableAccess>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Overrides the dialect inferred from `url`
    #[serde(default)]
    pub dialect: Option<Dialect>,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            dialect: None,
        }
    }
}

impl DatabaseConfig {
    /// Explicit dialect, else the one the URL implies, else the default.
    pub fn dialect(&self) -> Dialect {
        self.dialect
            .or_else(|| self.url.as_deref().and_then(Dialect::from_url))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directives
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Create a new configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn from_toml(content: &str) -> ModelResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ModelError::Config(format!("Failed to read config {}: {}", path.display(), e)))?;
        let mut config = Self::from_toml(&content)?;
        // relative schema paths are relative to the config file
        if let Some(dir) = path.parent() {
            config.schema = config
                .schema
                .take()
                .map(|schema| if schema.is_relative() { dir.join(schema) } else { schema });
        }
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `<config_dir>/restmodel/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("restmodel").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// Lookup order: `explicit`, then `$RESTMODEL_CONFIG`, then
    /// [`Config::default_path`], then built-in defaults. A file named
    /// explicitly or through the environment must exist.
    /// `$RESTMODEL_DATABASE_URL` overrides the database URL.
    pub fn load(explicit: Option<&Path>) -> ModelResult<Self> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(path)?,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            config.database.url = Some(url);
        }
        Ok(config)
    }

    /// All tables: the external schema file first, inline `[[tables]]` after.
    pub fn registry(&self) -> ModelResult<SchemaRegistry> {
        let mut registry = SchemaRegistry::new();
        if let Some(path) = &self.schema {
            registry.load_from_file(path)?;
        }
        for table in &self.tables {
            registry.add_table(table.clone());
        }
        Ok(registry)
    }

    /// Access rules for `table`; open when none are configured.
    pub fn access(&self, table: &str) -> TableAccess {
        self.access.get(table).cloned().unwrap_or_default()
    }

    pub fn dialect(&self) -> Dialect {
        self.database.dialect()
    }
}

/// Builder for Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database URL
    pub fn database(mut self, url: impl Into<String>) -> Self {
        self.config.database.url = Some(url.into());
        self
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.config.database.max_connections = n;
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.database.dialect = Some(dialect);
        self
    }

    pub fn table(mut self, table: Table) -> Self {
        self.config.tables.push(table);
        self
    }

    pub fn access(mut self, table: impl Into<String>, access: TableAccess) -> Self {
        self.config.access.insert(table.into(), access);
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.log.filter = filter.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [database]
        url = "mysql://root@localhost/app"

        [log]
        filter = "restmodel=debug"

        [[tables]]
        name = "user"
        columns = [{ name = "id", primary_key = true }, { name = "name" }, { name = "password" }]

        [access.user]
        select = { block = ["password"] }
        update_where = { allow = ["id"] }
    "#;

    #[test]
    fn test_parse_config() {
        let config = Config::from_toml(SAMPLE).unwrap();
        assert_eq!(config.dialect(), Dialect::MySQL);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.log.filter, "restmodel=debug");

        let registry = config.registry().unwrap();
        assert_eq!(registry.table("user").unwrap().columns.len(), 3);

        let access = config.access("user");
        assert!(!access.select.filter().allows("password"));
        assert!(access.update_where.filter().allows("id"));
        assert!(!access.update_where.filter().allows("name"));
        assert!(config.access("other").select.filter().is_open());
    }

    #[test]
    fn test_defaults_and_dialect_override() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.dialect(), Dialect::Postgres);
        assert_eq!(config.log.filter, "info");

        let config = Config::from_toml("[database]\nurl = \"postgres://x/y\"\ndialect = \"sqlite\"").unwrap();
        assert_eq!(config.dialect(), Dialect::SQLite);
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .database("sqlite::memory:")
            .max_connections(1)
            .table(Table::with_columns("t", ["id"]))
            .access("t", TableAccess::default())
            .build();
        assert_eq!(config.dialect(), Dialect::SQLite);
        assert_eq!(config.registry().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/restmodel.toml"))).unwrap_err();
        assert!(matches!(err, ModelError::Config(_)));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(Config::from_toml("[database"), Err(ModelError::Toml(_))));
    }
}
