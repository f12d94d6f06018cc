//! Validation run configuration.
//!
//! Only the company founding year, the default phone region and the
//! reference date are configurable. Every other threshold is a fixed
//! heuristic listed in [`thresholds`].

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use phonenumber::country;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed detector thresholds.
///
/// Percentages are expressed in percent (0-100), matching how they appear
/// in issue descriptions.
pub mod thresholds {
    /// Share of ages divisible by 5 above which rounding is suspicious.
    pub const AGE_ROUNDING_PERCENT: f64 = 40.0;
    /// Ages must be divisible by this to count as rounded.
    pub const AGE_ROUNDING_STEP: f64 = 5.0;
    /// Share of records holding the single most common age.
    pub const AGE_CLUSTER_PERCENT: f64 = 10.0;
    /// Age clustering only applies with more distinct ages than this.
    pub const AGE_CLUSTER_MIN_DISTINCT: usize = 10;
    /// Share of dates on January 1st above which defaults are suspected.
    pub const NEW_YEARS_PERCENT: f64 = 20.0;
    /// Share of dates on one calendar day above which clustering is flagged.
    pub const DATE_CLUSTER_PERCENT: f64 = 5.0;
    /// Date clustering only applies with more distinct dates than this.
    pub const DATE_CLUSTER_MIN_DISTINCT: usize = 20;
    /// Standard deviations above the monthly mean that make a spike.
    pub const SPIKE_STD_DEVS: f64 = 2.0;
    /// Employment longer than this many years is unusual.
    pub const MAX_EMPLOYMENT_YEARS: f64 = 50.0;
    /// Minimum plausible working age in years.
    pub const MIN_WORKING_AGE: f64 = 16.0;
    /// Maximum plausible working age in years.
    pub const MAX_WORKING_AGE: f64 = 80.0;
    /// Tolerated gap in years between stated and calculated age.
    pub const AGE_TOLERANCE_YEARS: f64 = 1.0;

    /// Duplicate groups shown per issue.
    pub const MAX_GROUP_EXAMPLES: usize = 5;
    /// Sample records shown per duplicate group or spike month.
    pub const MAX_GROUP_RECORDS: usize = 3;
    /// Records shown per record-level issue.
    pub const MAX_RECORD_EXAMPLES: usize = 10;
}

/// Earliest founding year accepted by [`ValidatorConfig::validate`].
pub const MIN_FOUNDING_YEAR: i32 = 1800;
/// Latest founding year accepted by [`ValidatorConfig::validate`].
pub const MAX_FOUNDING_YEAR: i32 = 9999;

/// Validation errors for validator configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("company_founding_year must be between {MIN_FOUNDING_YEAR} and {MAX_FOUNDING_YEAR}, got {0}")]
    InvalidFoundingYear(i32),
    #[error("phone_region must be an ISO 3166-1 alpha-2 region code, got '{0}'")]
    UnknownRegion(String),
}

/// Validator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Year the company was founded; earlier join dates are impossible
    pub company_founding_year: i32,
    /// Region assumed for phone numbers without a country prefix
    pub phone_region: String,
    /// Date treated as "today"; `None` uses the current UTC date
    pub reference_date: Option<NaiveDate>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            company_founding_year: 1990,
            phone_region: "US".to_string(),
            reference_date: None,
        }
    }
}

impl ValidatorConfig {
    /// Creates a new validator config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the company founding year.
    pub fn with_company_founding_year(mut self, year: i32) -> Self {
        if !(MIN_FOUNDING_YEAR..=MAX_FOUNDING_YEAR).contains(&year) {
            tracing::warn!(
                "company_founding_year {} clamped to valid range [{}, {}]",
                year,
                MIN_FOUNDING_YEAR,
                MAX_FOUNDING_YEAR
            );
        }
        self.company_founding_year = year.clamp(MIN_FOUNDING_YEAR, MAX_FOUNDING_YEAR);
        self
    }

    /// Builder method to set the default phone region (e.g. "US", "GB").
    pub fn with_phone_region(mut self, region: impl Into<String>) -> Self {
        self.phone_region = region.into().trim().to_ascii_uppercase();
        self
    }

    /// Builder method to pin the reference date.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Resolves the reference date, falling back to today's UTC date.
    pub fn resolve_reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Resolves the phone region to a known country id.
    pub fn region_id(&self) -> Option<country::Id> {
        country::Id::from_str(&self.phone_region.trim().to_ascii_uppercase()).ok()
    }

    /// Validates the configuration.
    ///
    /// Returns an error if the founding year is out of range or the phone
    /// region is not a known region code.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(MIN_FOUNDING_YEAR..=MAX_FOUNDING_YEAR).contains(&self.company_founding_year) {
            return Err(ConfigValidationError::InvalidFoundingYear(
                self.company_founding_year,
            ));
        }
        if self.region_id().is_none() {
            return Err(ConfigValidationError::UnknownRegion(
                self.phone_region.clone(),
            ));
        }
        Ok(())
    }
}
