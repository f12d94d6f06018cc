//! Error types for recordlint.
//!
//! Detector-level problems never surface here: a detector that cannot run
//! contributes zero issues instead. These errors cover the fallible edges
//! around a validation run, such as building a table, checking configuration,
//! reading input and writing reports.

use thiserror::Error;

/// Main error type for recordlint operations.
#[derive(Debug, Error)]
pub enum RecordLintError {
    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Input could not be assembled into a rectangular table
    #[error("Invalid table: {message}")]
    Table { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// CSV reading or writing failed
    #[error("CSV processing failed: {context}")]
    Csv {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Convenience type alias for Results with RecordLintError
pub type Result<T> = std::result::Result<T, RecordLintError>;

impl RecordLintError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a table construction error
    pub fn table(message: impl Into<String>) -> Self {
        Self::Table {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Creates a CSV error with context
    ///
    /// Generic over the source so the core does not have to depend on the
    /// CSV reader used by the binary.
    pub fn csv<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Csv {
            context: context.into(),
            source: Box::new(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = RecordLintError::configuration("company_founding_year out of range");
        assert!(error.to_string().contains("company_founding_year"));

        let error = RecordLintError::table("column 'age' has 3 values, expected 4");
        assert!(error.to_string().starts_with("Invalid table"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let error = RecordLintError::io("Failed to open input", source);

        assert!(error.to_string().contains("Failed to open input"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_csv_error_boxes_source() {
        let source = std::io::Error::other("bad quote");
        let error = RecordLintError::csv("Failed to parse row 3", source);

        assert!(matches!(error, RecordLintError::Csv { .. }));
        assert!(error.to_string().contains("row 3"));
    }
}
