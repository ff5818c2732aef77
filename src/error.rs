//! Error types for restmodel.

use thiserror::Error;

/// The main error type for restmodel operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An update document carried no `values`, or none survived filtering.
    #[error("update not has values")]
    NoValues,

    /// An insert carried no record objects.
    #[error("insert not has records")]
    NoRecords,

    /// A projection key string could not be parsed.
    #[error("Malformed key '{key}': {message}")]
    MalformedKey { key: String, message: String },

    /// The delta of an `$incr.` assignment is not an integer.
    #[error("Invalid increment '{0}'")]
    InvalidIncrement(String),

    /// A select statement ended up with no selectable columns.
    #[error("No selectable columns left for table '{0}'")]
    EmptyProjection(String),

    /// The requested table is not registered.
    #[error("Unknown table: '{0}'")]
    UnknownTable(String),

    /// A named placeholder had no value at bind time.
    #[error("Missing binding for placeholder ':{0}'")]
    MissingBinding(String),

    /// An expanding placeholder was bound to something that is not a list.
    #[error("Placeholder ':{0}' expands and must be bound to a list")]
    ExpandingBinding(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ModelError {
    /// Create a malformed key error.
    pub fn malformed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedKey {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for restmodel operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::malformed("count(", "unexpected end");
        assert_eq!(err.to_string(), "Malformed key 'count(': unexpected end");
        assert_eq!(ModelError::NoValues.to_string(), "update not has values");
    }
}
