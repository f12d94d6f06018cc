//! Report assembly.

use chrono::Utc;

use super::aggregate::{affected_percentage, affected_union, quality_score};
use super::models::{
    DetailedIssue, DetectorFailure, Issue, RecommendationBlock, Severity, ValidationReport,
    ValidationSummary,
};

/// Builds the final report from the issues of a run, in detection order.
pub(crate) fn build_report(
    issues: Vec<Issue>,
    total_records: usize,
    evaluation_errors: Vec<DetectorFailure>,
) -> ValidationReport {
    let count_of = |severity: Severity| issues.iter().filter(|i| i.severity == severity).count();
    let high = count_of(Severity::High);
    let medium = count_of(Severity::Medium);
    let low = count_of(Severity::Low);

    let total_affected = affected_union(&issues).len();
    let recommendations = recommendation_blocks(&issues);

    let summary = ValidationSummary {
        total_records,
        total_issues_found: issues.len(),
        high_severity_issues: high,
        medium_severity_issues: medium,
        low_severity_issues: low,
        total_affected_records: total_affected,
        data_quality_score: quality_score(total_affected, total_records),
        validation_timestamp: Utc::now(),
    };

    let detailed_issues = issues
        .into_iter()
        .map(|issue| DetailedIssue {
            affected_percentage: affected_percentage(issue.count, total_records),
            issue,
        })
        .collect();

    ValidationReport {
        summary,
        detailed_issues,
        recommendations,
        validation_passed: high == 0,
        evaluation_errors,
    }
}

/// Groups recommendations by severity, most urgent first.
///
/// Severities without issues get no block.
fn recommendation_blocks(issues: &[Issue]) -> Vec<RecommendationBlock> {
    Severity::ALL
        .into_iter()
        .filter_map(|severity| {
            let items: Vec<String> = issues
                .iter()
                .filter(|i| i.severity == severity)
                .map(|i| i.recommendation.clone())
                .collect();
            (!items.is_empty()).then(|| RecommendationBlock {
                priority: severity,
                title: severity.recommendation_title().to_string(),
                items,
            })
        })
        .collect()
}
