//! Catalog of validation rules.
//!
//! Each rule fixes the category label, severity and recommendation of the
//! issues it produces, so detectors only supply the numbers.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::table::RecordIndex;

use super::models::{Issue, Severity};

/// Detector family a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleFamily {
    /// Reused emails and phone numbers
    IdentityDuplication,
    /// Distributions that look fabricated
    PatternAnomaly,
    /// Values that break business constraints
    BusinessRule,
    /// Oddities that only show against the whole table
    ContextualIntegrity,
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::IdentityDuplication => "identity duplication",
            Self::PatternAnomaly => "pattern anomaly",
            Self::BusinessRule => "business rule",
            Self::ContextualIntegrity => "contextual integrity",
        };
        f.write_str(label)
    }
}

/// A validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Category label without any column suffix
    pub name: &'static str,
    /// Severity of every issue the rule reports
    pub severity: Severity,
    /// Detector family
    pub family: RuleFamily,
    /// Whether the rule runs once per matching column
    pub per_column: bool,
    /// Suggested remediation attached to each issue
    pub recommendation: &'static str,
}

impl Rule {
    /// Category label, suffixed with the column name for per-column rules.
    pub fn category(&self, column: Option<&str>) -> String {
        match column {
            Some(column) if self.per_column => format!("{} ({})", self.name, column),
            _ => self.name.to_string(),
        }
    }

    /// Creates an issue for this rule.
    pub fn issue(
        &self,
        column: Option<&str>,
        description: impl Into<String>,
        affected_records: BTreeSet<RecordIndex>,
    ) -> Issue {
        Issue::new(
            self.category(column),
            self.severity,
            description,
            affected_records,
            self.recommendation,
        )
    }
}

/// Two or more records share a normalized email.
pub const DUPLICATE_EMAILS: Rule = Rule {
    name: "Duplicate Email Addresses",
    severity: Severity::High,
    family: RuleFamily::IdentityDuplication,
    per_column: false,
    recommendation: "Review duplicate emails for data entry errors or legitimate shared accounts. Consider implementing unique email constraints.",
};

/// Two or more records share a normalized phone number in one column.
pub const DUPLICATE_PHONES: Rule = Rule {
    name: "Duplicate Phone Numbers",
    severity: Severity::High,
    family: RuleFamily::IdentityDuplication,
    per_column: true,
    recommendation: "Review duplicate phone numbers for data entry errors or shared contact information. Consider business rules for shared phones.",
};

/// Records with the same email also share one phone number.
pub const CONTACT_OVERLAP: Rule = Rule {
    name: "Complete Contact Information Overlap",
    severity: Severity::Medium,
    family: RuleFamily::IdentityDuplication,
    per_column: false,
    recommendation: "These may be legitimate duplicates or data entry errors. Review for consolidation opportunities.",
};

/// Too many ages are multiples of 5.
pub const AGE_ROUNDING: Rule = Rule {
    name: "Suspicious Age Rounding",
    severity: Severity::Medium,
    family: RuleFamily::PatternAnomaly,
    per_column: false,
    recommendation: "Review age data collection process. Consider if ages were estimated rather than calculated from birthdates.",
};

/// A single age dominates a varied age column.
pub const AGE_CLUSTERING: Rule = Rule {
    name: "Excessive Age Clustering",
    severity: Severity::Medium,
    family: RuleFamily::PatternAnomaly,
    per_column: false,
    recommendation: "Investigate why this specific age is so common. May indicate default value usage or data entry errors.",
};

/// Too many dates in a column fall on January 1st.
pub const NEW_YEARS_CLUSTERING: Rule = Rule {
    name: "Suspicious Date Clustering - January 1st",
    severity: Severity::Medium,
    family: RuleFamily::PatternAnomaly,
    per_column: true,
    recommendation: "Review data collection process. January 1st clustering often indicates missing or unknown dates filled with defaults.",
};

/// A single date dominates a varied date column.
pub const DATE_CLUSTERING: Rule = Rule {
    name: "Excessive Date Clustering",
    severity: Severity::Medium,
    family: RuleFamily::PatternAnomaly,
    per_column: true,
    recommendation: "Investigate clustering around this specific date. May indicate bulk data imports or system-generated dates.",
};

/// Join dates after the reference date.
pub const FUTURE_JOIN_DATES: Rule = Rule {
    name: "Future Join Dates",
    severity: Severity::High,
    family: RuleFamily::BusinessRule,
    per_column: true,
    recommendation: "Review and correct future join dates. These are likely data entry errors.",
};

/// Join dates before the company founding year.
pub const JOIN_BEFORE_FOUNDING: Rule = Rule {
    name: "Join Dates Before Company Founding",
    severity: Severity::High,
    family: RuleFamily::BusinessRule,
    per_column: true,
    recommendation: "Verify company founding year or correct impossible join dates.",
};

/// Stated age disagrees with the age derived from the birth date.
pub const AGE_BIRTHDATE_MISMATCH: Rule = Rule {
    name: "Age-Birthdate Inconsistency",
    severity: Severity::Medium,
    family: RuleFamily::BusinessRule,
    per_column: false,
    recommendation: "Review age calculation logic or data entry processes. Consider using birthdate as single source of truth for age.",
};

/// Join date earlier than birth date.
pub const JOIN_BEFORE_BIRTH: Rule = Rule {
    name: "Impossible Date Relationships",
    severity: Severity::High,
    family: RuleFamily::BusinessRule,
    per_column: false,
    recommendation: "Critical data error: Join dates cannot be before birth dates. Review and correct these records immediately.",
};

/// Joined before reaching working age.
pub const UNDERAGE_AT_JOIN: Rule = Rule {
    name: "Unreasonably Young Employees",
    severity: Severity::Medium,
    family: RuleFamily::BusinessRule,
    per_column: false,
    recommendation: "Review hiring policies and data accuracy. Consider if these are data entry errors or special cases (internships, etc.).",
};

/// Employed for more than 50 years.
pub const LONG_EMPLOYMENT: Rule = Rule {
    name: "Unusually Long Employment Duration",
    severity: Severity::Medium,
    family: RuleFamily::BusinessRule,
    per_column: false,
    recommendation: "Review join dates for accuracy. Employment over 50 years may indicate data entry errors or legacy system issues.",
};

/// A month with far more joins than the rest.
pub const BULK_IMPORT: Rule = Rule {
    name: "Bulk Import Pattern Detection",
    severity: Severity::Low,
    family: RuleFamily::ContextualIntegrity,
    per_column: true,
    recommendation: "Review data import processes. Bulk imports may indicate data migration or system changes that should be documented.",
};

/// Ages under 16.
pub const AGE_TOO_YOUNG: Rule = Rule {
    name: "Unreasonably Young Ages",
    severity: Severity::High,
    family: RuleFamily::ContextualIntegrity,
    per_column: false,
    recommendation: "Review minimum age policies and data accuracy. Ages under 16 are unusual for employment records.",
};

/// Ages over 80.
pub const AGE_TOO_OLD: Rule = Rule {
    name: "Unreasonably Old Ages",
    severity: Severity::Medium,
    family: RuleFamily::ContextualIntegrity,
    per_column: false,
    recommendation: "Review retirement policies and data accuracy. Ages over 80 may indicate data entry errors or special employment arrangements.",
};

/// Every rule, in the order issues are reported.
pub const RULES: &[Rule] = &[
    DUPLICATE_EMAILS,
    DUPLICATE_PHONES,
    CONTACT_OVERLAP,
    AGE_ROUNDING,
    AGE_CLUSTERING,
    NEW_YEARS_CLUSTERING,
    DATE_CLUSTERING,
    FUTURE_JOIN_DATES,
    JOIN_BEFORE_FOUNDING,
    AGE_BIRTHDATE_MISMATCH,
    JOIN_BEFORE_BIRTH,
    UNDERAGE_AT_JOIN,
    BULK_IMPORT,
    AGE_TOO_YOUNG,
    AGE_TOO_OLD,
    LONG_EMPLOYMENT,
];
