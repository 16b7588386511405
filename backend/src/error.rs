//! Error types for the energy explorer.
//!
//! This module defines one error type per layer:
//!
//! - [`CsvError`] - Raw CSV decoding errors with line/column context
//! - [`DatasetError`] - Loading and schema errors (fail loudly at startup)
//! - [`QueryError`] - Invalid query arguments and type mismatches
//! - [`ConfigError`] - Invalid environment configuration
//! - [`ServerError`] - HTTP-facing errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

pub use crate::parser::CsvError;

// =============================================================================
// Dataset Errors
// =============================================================================

/// Errors while loading the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Failed to read file.
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV content or an unparseable cell.
    #[error("Invalid dataset: {0}")]
    Csv(#[from] CsvError),

    /// Required columns are absent from the header.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Header present but no data rows.
    #[error("Dataset contains no rows")]
    Empty,
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors raised by the query layer.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    /// Field name does not belong to the schema.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A numeric operation was requested on a text field.
    #[error("Field '{0}' is not numeric")]
    NotNumeric(String),

    /// Entity not present in the dataset.
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// Row limit must be positive.
    #[error("Limit must be at least 1, got {0}")]
    InvalidLimit(usize),
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors while reading settings from the environment.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Dataset error.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Query error.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> DatasetError -> ServerError
        let csv_err = CsvError::new(3, "bad number").with_column("Year");
        let dataset_err: DatasetError = csv_err.into();
        assert!(dataset_err.to_string().contains("Line 3"));

        let server_err: ServerError = dataset_err.into();
        assert!(server_err.to_string().contains("Year"));

        // QueryError -> ServerError
        let query_err = QueryError::NotNumeric("Entity".into());
        let server_err: ServerError = query_err.into();
        assert!(server_err.to_string().contains("not numeric"));
    }

    #[test]
    fn test_config_error_names_variable() {
        let err = ConfigError::InvalidValue {
            key: "PORT".into(),
            value: "eighty".into(),
        };
        assert_eq!(err.to_string(), "Invalid value for PORT: 'eighty'");
    }

    #[test]
    fn test_missing_columns_format() {
        let err = DatasetError::MissingColumns(vec!["Year".into(), "gdp_per_capita".into()]);
        let msg = err.to_string();
        assert!(msg.contains("Year, gdp_per_capita"));
    }
}
