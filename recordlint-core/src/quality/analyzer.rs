//! Validator facade.
//!
//! This module provides the [`Validator`] that runs every detector over a
//! table and assembles the report.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::Result;
use crate::error::RecordLintError;
use crate::table::Table;

use super::business::{
    detect_age_birthdate_mismatch, detect_birth_join_ordering, detect_join_date_violations,
    detect_long_employment,
};
use super::config::ValidatorConfig;
use super::context::DetectionContext;
use super::contextual::{detect_age_ranges, detect_bulk_imports};
use super::duplicates::{detect_contact_overlap, detect_duplicate_emails, detect_duplicate_phones};
use super::models::{DetectorFailure, Issue, ValidationReport};
use super::patterns::{detect_age_patterns, detect_date_clustering};
use super::report::build_report;

type DetectorFn = fn(&DetectionContext<'_>) -> Vec<Issue>;

/// Detectors in report order.
const DETECTORS: &[(&str, DetectorFn)] = &[
    ("duplicate_emails", detect_duplicate_emails),
    ("duplicate_phones", detect_duplicate_phones),
    ("contact_overlap", detect_contact_overlap),
    ("age_patterns", detect_age_patterns),
    ("date_clustering", detect_date_clustering),
    ("join_dates", detect_join_date_violations),
    ("age_birthdate_consistency", detect_age_birthdate_mismatch),
    ("birth_join_ordering", detect_birth_join_ordering),
    ("bulk_imports", detect_bulk_imports),
    ("age_ranges", detect_age_ranges),
    ("employment_duration", detect_long_employment),
];

/// Validates a table with the given configuration.
///
/// Never fails: detectors that cannot apply contribute no issues, and a
/// detector that panics is listed in the report's `evaluation_errors`.
///
/// # Example
///
/// ```rust
/// use recordlint_core::{Table, ValidatorConfig, validate};
/// use serde_json::json;
///
/// let table = Table::from_rows(&[
///     json!({"email": "ann@example.com", "age": 34}),
///     json!({"email": "ANN@example.com ", "age": 41}),
/// ])
/// .unwrap();
///
/// let report = validate(&table, &ValidatorConfig::default());
/// assert!(!report.validation_passed);
/// assert_eq!(report.summary.total_affected_records, 2);
/// ```
pub fn validate(table: &Table, config: &ValidatorConfig) -> ValidationReport {
    let ctx = DetectionContext::new(table, config);
    tracing::info!(
        "Validating {} records across {} columns (reference date {})",
        table.row_count(),
        table.columns().len(),
        ctx.reference_date
    );

    let (issues, failures) = run_detectors(&ctx, DETECTORS);
    let report = build_report(issues, table.row_count(), failures);

    tracing::info!(
        "Validation completed: {} issues, {} affected records, score {:.1}",
        report.summary.total_issues_found,
        report.summary.total_affected_records,
        report.summary.data_quality_score
    );
    report
}

/// Runs detectors in order, isolating panics.
fn run_detectors(
    ctx: &DetectionContext<'_>,
    detectors: &[(&str, DetectorFn)],
) -> (Vec<Issue>, Vec<DetectorFailure>) {
    let mut issues = Vec::new();
    let mut failures = Vec::new();

    for (name, detector) in detectors {
        match panic::catch_unwind(AssertUnwindSafe(|| detector(ctx))) {
            Ok(found) => {
                tracing::debug!("Detector '{}' reported {} issues", name, found.len());
                issues.extend(found);
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!("Detector '{}' failed: {}", name, message);
                failures.push(DetectorFailure {
                    detector: (*name).to_string(),
                    message,
                });
            }
        }
    }

    (issues, failures)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "detector panicked".to_string()
    }
}

/// Data quality validator for tabular records.
///
/// # Example
///
/// ```rust,ignore
/// use recordlint_core::{Validator, ValidatorConfig};
///
/// let validator = Validator::try_new(ValidatorConfig::new().with_company_founding_year(2004))?;
/// let report = validator.validate(&table);
/// println!("Quality score: {:.1}", report.summary.data_quality_score);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    /// Creates a new validator with the given configuration.
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Creates a validator after checking the configuration.
    ///
    /// # Errors
    /// Returns [`RecordLintError::Configuration`] if the configuration is invalid.
    pub fn try_new(config: ValidatorConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| RecordLintError::configuration(e.to_string()))?;
        Ok(Self::new(config))
    }

    /// Creates a new validator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ValidatorConfig::default())
    }

    /// Returns a reference to the validator configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates one table.
    pub fn validate(&self, table: &Table) -> ValidationReport {
        validate(table, &self.config)
    }
}
