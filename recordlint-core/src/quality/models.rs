//! Validation result models.
//!
//! Issues are the unit of output: every detector reports zero or more of
//! them, and the report aggregates them into a summary and a set of
//! severity-grouped recommendations.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::table::{RecordIndex, RecordSnapshot};

/// Severity of a detected issue.
///
/// Ordered from most to least urgent so sorting puts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Data is wrong or impossible and blocks a passing run
    High,
    /// Data is implausible and worth a review
    Medium,
    /// Data looks like a process artifact
    Low,
}

impl Severity {
    /// All severities from most to least urgent.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Upper-case label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Title of the recommendation block for this severity.
    pub fn recommendation_title(&self) -> &'static str {
        match self {
            Self::High => "Critical Data Issues Requiring Immediate Attention",
            Self::Medium => "Data Quality Improvements",
            Self::Low => "Process Improvements and Monitoring",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Illustrative evidence attached to an issue.
///
/// The shape depends on the detector that produced it. Serialized without a
/// tag, so each variant reads as a plain JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Example {
    /// Records sharing one normalized email address
    EmailGroup {
        email: String,
        count: usize,
        records: Vec<RecordSnapshot>,
    },
    /// Records sharing one normalized phone number
    PhoneGroup {
        normalized_phone: String,
        count: usize,
        records: Vec<RecordSnapshot>,
    },
    /// Records sharing both email and phone
    ContactOverlap {
        email: String,
        phone: String,
        phone_column: String,
        record_count: usize,
        indices: Vec<RecordIndex>,
    },
    /// Stated age disagreeing with the birth date
    AgeMismatch {
        record_index: RecordIndex,
        stated_age: f64,
        calculated_age: i64,
        birthdate: Value,
        difference: f64,
    },
    /// Join date relative to birth date
    AgeAtJoin {
        record_index: RecordIndex,
        birth_date: NaiveDate,
        join_date: NaiveDate,
        age_at_join: f64,
    },
    /// Tenure measured from the join date
    EmploymentDuration {
        record_index: RecordIndex,
        join_date: NaiveDate,
        duration_years: f64,
    },
    /// A month with an unusual number of events
    SpikeMonth {
        period: String,
        count: usize,
        percentage_of_total: f64,
        sample_records: Vec<RecordSnapshot>,
    },
    /// A full record; must stay last so it only matches when nothing else does
    Record(RecordSnapshot),
}

/// A detected data quality issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue category, may carry a column name suffix
    pub category: String,
    /// Severity fixed by the rule that produced the issue
    pub severity: Severity,
    /// Human-readable description with concrete numbers
    pub description: String,
    /// Record indices implicated by the issue
    pub affected_records: BTreeSet<RecordIndex>,
    /// Bounded list of illustrative examples
    pub examples: Vec<Example>,
    /// Number of occurrences; usually the affected record count
    pub count: usize,
    /// Remediation advice
    pub recommendation: String,
}

impl Issue {
    /// Creates an issue whose count is the number of affected records.
    pub fn new(
        category: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        affected_records: BTreeSet<RecordIndex>,
        recommendation: impl Into<String>,
    ) -> Self {
        let count = affected_records.len();
        Self {
            category: category.into(),
            severity,
            description: description.into(),
            affected_records,
            examples: Vec::new(),
            count,
            recommendation: recommendation.into(),
        }
    }

    /// Sets the examples.
    pub fn with_examples(mut self, examples: Vec<Example>) -> Self {
        self.examples = examples;
        self
    }

    /// Overrides the occurrence count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// A detector that failed to run.
///
/// Failures are kept out of the issue list so they never affect the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorFailure {
    /// Detector name
    pub detector: String,
    /// Failure message
    pub message: String,
}

/// Top-level counts and score of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Number of records in the table
    pub total_records: usize,
    /// Number of issues reported
    pub total_issues_found: usize,
    /// Issues with HIGH severity
    pub high_severity_issues: usize,
    /// Issues with MEDIUM severity
    pub medium_severity_issues: usize,
    /// Issues with LOW severity
    pub low_severity_issues: usize,
    /// Distinct records affected by any issue
    pub total_affected_records: usize,
    /// Score from 0 to 100, one decimal place
    pub data_quality_score: f64,
    /// When the run finished
    pub validation_timestamp: DateTime<Utc>,
}

/// An issue together with its share of the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedIssue {
    /// The issue itself, flattened when serialized
    #[serde(flatten)]
    pub issue: Issue,
    /// Share of records implicated by `count`, two decimal places
    pub affected_percentage: f64,
}

/// Recommendations of one severity level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationBlock {
    /// Severity the block covers
    pub priority: Severity,
    /// Block heading
    pub title: String,
    /// Recommendations in issue order
    pub items: Vec<String>,
}

/// Complete result of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Counts and score for the whole run
    pub summary: ValidationSummary,
    /// Issues in detection order
    pub detailed_issues: Vec<DetailedIssue>,
    /// Recommendations grouped by severity, HIGH first
    pub recommendations: Vec<RecommendationBlock>,
    /// True when no HIGH severity issue was found
    pub validation_passed: bool,
    /// Detectors that failed and were skipped
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evaluation_errors: Vec<DetectorFailure>,
}

impl ValidationReport {
    /// Iterates over the reported issues in detection order.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.detailed_issues.iter().map(|d| &d.issue)
    }

    /// Finds an issue by its exact category.
    pub fn issue(&self, category: &str) -> Option<&DetailedIssue> {
        self.detailed_issues
            .iter()
            .find(|d| d.issue.category == category)
    }

    /// Flattens the issues into rows for tabular export.
    pub fn issue_rows(&self) -> Vec<IssueRow> {
        self.detailed_issues.iter().map(IssueRow::from).collect()
    }
}

/// One issue as a flat row, without examples or record indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRow {
    /// Issue category label
    pub category: String,
    /// Issue severity
    pub severity: Severity,
    /// Human-readable summary
    pub description: String,
    /// Number of affected records
    pub count: usize,
    /// Affected share of the table, in percent
    pub affected_percentage: f64,
    /// Suggested remediation
    pub recommendation: String,
}

impl From<&DetailedIssue> for IssueRow {
    fn from(detailed: &DetailedIssue) -> Self {
        Self {
            category: detailed.issue.category.clone(),
            severity: detailed.issue.severity,
            description: detailed.issue.description.clone(),
            count: detailed.issue.count,
            affected_percentage: detailed.affected_percentage,
            recommendation: detailed.issue.recommendation.clone(),
        }
    }
}
