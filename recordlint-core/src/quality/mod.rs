//! Data quality validation engine.
//!
//! This module finds logical and statistical defects in tabular records:
//! - **Identity duplication**: shared emails and phone numbers
//! - **Pattern anomalies**: rounded or clustered ages, defaulted dates
//! - **Business rules**: impossible or implausible join and birth dates
//! - **Contextual integrity**: bulk import spikes, out-of-range ages
//!
//! Detectors are independent and read-only. Their issues are folded into a
//! [`ValidationReport`] with a quality score and severity-ranked
//! recommendations.
//!
//! # Example
//! ```rust,ignore
//! use recordlint_core::quality::{Validator, ValidatorConfig};
//!
//! let validator = Validator::new(ValidatorConfig::default());
//! let report = validator.validate(&table);
//! println!("Quality score: {:.1}", report.summary.data_quality_score);
//! ```

mod aggregate;
mod analyzer;
mod business;
mod columns;
pub mod config;
mod context;
mod contextual;
mod duplicates;
mod models;
mod normalize;
mod patterns;
mod report;
mod rules;

// Re-export public API
pub use aggregate::{PERFECT_SCORE, affected_percentage, affected_union, quality_score};
pub use analyzer::{Validator, validate};
pub use columns::{
    ColumnMap, ColumnRole, classify_column, is_age_column, is_birth_column, is_date_like,
    is_email_column, is_join_column, is_phone_column,
};
pub use config::{ConfigValidationError, ValidatorConfig};
pub use models::{
    DetailedIssue, DetectorFailure, Example, Issue, IssueRow, RecommendationBlock, Severity,
    ValidationReport, ValidationSummary,
};
pub use normalize::{normalize_email, normalize_phone};
pub use rules::{RULES, Rule, RuleFamily};
