//! Error types for the recordmap core library
//!
//! Conversions between remote records and local attributes never fail. The
//! fallible surfaces are schema definition loading and correspondence
//! validation, and they report through the `Error` type defined here.

use thiserror::Error;

/// Main error type for recordmap operations
#[derive(Error, Debug)]
pub enum Error {
    /// A schema definition file could not be read or parsed
    #[error("Schema file error: {message}")]
    SchemaFile {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A correspondence failed validation
    #[error("Schema validation failed: {message}")]
    SchemaValidation {
        message: String,
        table: Option<String>,
    },

    /// A table was requested that the registry does not know about
    #[error("Unknown table: {name}")]
    UnknownTable {
        name: String,
        known: Vec<String>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a schema file error from any displayable cause
    pub fn schema_file(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Error::SchemaFile {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::SchemaValidation {
            message: "local field 'name' is targeted twice".to_string(),
            table: Some("contacts".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Schema validation failed: local field 'name' is targeted twice"
        );
    }

    #[test]
    fn test_unknown_table_display() {
        let err = Error::UnknownTable {
            name: "orders".to_string(),
            known: vec!["contacts".to_string()],
        };
        assert_eq!(err.to_string(), "Unknown table: orders");
    }

    #[test]
    fn test_json_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Json { .. }));
        assert!(err.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn test_schema_file_keeps_source() {
        let err = Error::schema_file("bad tables", anyhow::anyhow!("missing key"));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("missing key"));
    }
}
