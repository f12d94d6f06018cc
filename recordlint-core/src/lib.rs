//! Core data structures and validation engine for recordlint.
//!
//! This crate finds data quality defects in tabular records that type and
//! format checks miss: duplicate identities, suspicious statistical
//! clustering, broken temporal rules and signs of bulk or artificial data.
//! It consumes an already-parsed [`Table`] and produces a serializable
//! [`ValidationReport`]; reading files and presenting results is left to
//! callers such as the `recordlint` binary.
//!
//! # Guarantees
//! - The input table is never modified
//! - A validation run always produces a report, even when a detector fails
//! - Reports are deterministic apart from their timestamp
//!
//! # Example
//! ```rust
//! use recordlint_core::{Table, ValidatorConfig, validate};
//! use serde_json::json;
//!
//! let table = Table::from_rows(&[json!({"email": "ann@example.com", "age": 34})]).unwrap();
//! let report = validate(&table, &ValidatorConfig::default());
//! assert!(report.validation_passed);
//! ```

pub mod error;
pub mod logging;
pub mod quality;
pub mod table;
pub mod temporal;

// Re-export commonly used types
pub use error::{RecordLintError, Result};
pub use quality::{
    ColumnMap, ColumnRole, ConfigValidationError, DetailedIssue, DetectorFailure, Example, Issue,
    IssueRow, RULES, RecommendationBlock, Rule, RuleFamily, Severity, ValidationReport,
    ValidationSummary, Validator, ValidatorConfig, classify_column, normalize_email,
    normalize_phone, validate,
};
pub use table::{Column, RecordIndex, RecordSnapshot, Table};
