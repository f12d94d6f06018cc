//! Statistical pattern anomalies.
//!
//! Real populations rarely cluster on round ages or on a single calendar
//! day. These detectors flag distributions that look estimated, defaulted
//! or generated.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::table::{Column, RecordIndex};
use crate::temporal::is_new_years_day;

use super::config::thresholds::{
    AGE_CLUSTER_MIN_DISTINCT, AGE_CLUSTER_PERCENT, AGE_ROUNDING_PERCENT, AGE_ROUNDING_STEP,
    DATE_CLUSTER_MIN_DISTINCT, DATE_CLUSTER_PERCENT, MAX_RECORD_EXAMPLES, NEW_YEARS_PERCENT,
};
use super::context::DetectionContext;
use super::duplicates::{ValueGroup, group_by_value};
use super::models::Issue;
use super::rules::{AGE_CLUSTERING, AGE_ROUNDING, DATE_CLUSTERING, NEW_YEARS_CLUSTERING};

/// Hashable form of an age; `-0.0` and `0.0` share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AgeKey(u64);

impl AgeKey {
    fn new(age: f64) -> Self {
        Self((age + 0.0).to_bits())
    }

    fn value(self) -> f64 {
        f64::from_bits(self.0)
    }
}

/// Formats a number without a trailing `.0` when it is whole.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64 * 100.0
}

/// The largest group; ties go to the value seen first.
fn most_common<K>(groups: &[ValueGroup<K>]) -> Option<&ValueGroup<K>> {
    groups.iter().fold(None, |best, group| match best {
        Some(current) if current.indices.len() >= group.indices.len() => Some(current),
        _ => Some(group),
    })
}

/// Detects rounded and clustered ages.
pub(crate) fn detect_age_patterns(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let Some(column) = ctx.columns.age else {
        tracing::debug!("No age column, skipping age pattern analysis");
        return Vec::new();
    };

    let ages: Vec<(RecordIndex, f64)> = column.numbers().collect();
    if ages.is_empty() {
        tracing::debug!("Age column holds no numeric values");
        return Vec::new();
    }

    let mut issues = Vec::new();
    issues.extend(check_age_rounding(ctx, &ages));
    issues.extend(check_age_clustering(ctx, &ages));
    issues
}

fn check_age_rounding(ctx: &DetectionContext<'_>, ages: &[(RecordIndex, f64)]) -> Option<Issue> {
    let rounded: BTreeSet<RecordIndex> = ages
        .iter()
        .filter(|(_, age)| age % AGE_ROUNDING_STEP == 0.0)
        .map(|(index, _)| *index)
        .collect();

    let rounded_percentage = percent(rounded.len(), ages.len());
    if rounded_percentage <= AGE_ROUNDING_PERCENT {
        return None;
    }

    let examples = ctx.record_examples(&rounded, MAX_RECORD_EXAMPLES);
    Some(
        AGE_ROUNDING
            .issue(
                None,
                format!(
                    "{:.1}% of ages are rounded to multiples of 5, suggesting artificial data",
                    rounded_percentage
                ),
                rounded,
            )
            .with_examples(examples),
    )
}

fn check_age_clustering(
    ctx: &DetectionContext<'_>,
    ages: &[(RecordIndex, f64)],
) -> Option<Issue> {
    let keyed: Vec<(RecordIndex, AgeKey)> = ages
        .iter()
        .map(|(index, age)| (*index, AgeKey::new(*age)))
        .collect();
    let groups = group_by_value(&keyed);
    if groups.len() <= AGE_CLUSTER_MIN_DISTINCT {
        return None;
    }

    let top = most_common(&groups)?;
    let max_count = top.indices.len();
    let cluster_percentage = percent(max_count, ages.len());
    if cluster_percentage <= AGE_CLUSTER_PERCENT {
        return None;
    }

    let examples = ctx.record_examples(&top.indices, MAX_RECORD_EXAMPLES);
    Some(
        AGE_CLUSTERING
            .issue(
                None,
                format!(
                    "Age {} appears {} times ({:.1}% of records)",
                    format_number(top.value.value()),
                    max_count,
                    cluster_percentage
                ),
                top.indices.iter().copied().collect(),
            )
            .with_examples(examples),
    )
}

/// Detects January 1st defaults and single-day clustering in date columns.
pub(crate) fn detect_date_clustering(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();
    for column in &ctx.columns.date_like {
        let dates: Vec<(RecordIndex, NaiveDate)> = column.dates().collect();
        if dates.is_empty() {
            tracing::debug!("Column '{}' holds no parseable dates", column.name);
            continue;
        }

        issues.extend(check_new_years_clustering(ctx, column, &dates));
        issues.extend(check_single_date_clustering(ctx, column, &dates));
    }
    issues
}

fn check_new_years_clustering(
    ctx: &DetectionContext<'_>,
    column: &Column,
    dates: &[(RecordIndex, NaiveDate)],
) -> Option<Issue> {
    let new_years: BTreeSet<RecordIndex> = dates
        .iter()
        .filter(|(_, date)| is_new_years_day(*date))
        .map(|(index, _)| *index)
        .collect();

    let new_years_percentage = percent(new_years.len(), dates.len());
    if new_years_percentage <= NEW_YEARS_PERCENT {
        return None;
    }

    let examples = ctx.record_examples(&new_years, MAX_RECORD_EXAMPLES);
    Some(
        NEW_YEARS_CLUSTERING
            .issue(
                Some(column.name.as_str()),
                format!(
                    "{:.1}% of {} values are January 1st, suggesting default values",
                    new_years_percentage, column.name
                ),
                new_years,
            )
            .with_examples(examples),
    )
}

fn check_single_date_clustering(
    ctx: &DetectionContext<'_>,
    column: &Column,
    dates: &[(RecordIndex, NaiveDate)],
) -> Option<Issue> {
    let groups = group_by_value(dates);
    if groups.len() <= DATE_CLUSTER_MIN_DISTINCT {
        return None;
    }

    let top = most_common(&groups)?;
    let max_count = top.indices.len();
    let cluster_percentage = percent(max_count, dates.len());
    if cluster_percentage <= DATE_CLUSTER_PERCENT {
        return None;
    }

    let examples = ctx.record_examples(&top.indices, MAX_RECORD_EXAMPLES);
    Some(
        DATE_CLUSTERING
            .issue(
                Some(column.name.as_str()),
                format!(
                    "Date {} appears {} times ({:.1}% of records)",
                    top.value, max_count, cluster_percentage
                ),
                top.indices.iter().copied().collect(),
            )
            .with_examples(examples),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::context::test_support::{create_context, create_table};
    use crate::quality::models::{Example, Severity};
    use serde_json::{Value, json};

    fn ages(values: &[f64]) -> Vec<Value> {
        values.iter().map(|age| json!({ "age": age })).collect()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(30.0), "30");
        assert_eq!(format_number(30.5), "30.5");
    }

    #[test]
    fn test_age_rounding_fires_above_threshold() {
        let table = create_table(ages(&[
            20.0, 25.0, 30.0, 35.0, 20.0, 25.0, 30.0, 35.0, 20.0, 25.0,
        ]));
        let issues = detect_age_patterns(&create_context(&table));

        let issue = issues
            .iter()
            .find(|i| i.category == "Suspicious Age Rounding")
            .unwrap();
        assert_eq!(issue.severity, Severity::Medium);
        assert_eq!(issue.count, 10);
        assert_eq!(
            issue.description,
            "100.0% of ages are rounded to multiples of 5, suggesting artificial data"
        );
        assert_eq!(issue.examples.len(), 10);
        assert!(matches!(&issue.examples[0], Example::Record(s) if s.record_index == 0));
    }

    #[test]
    fn test_age_rounding_at_threshold_does_not_fire() {
        // 4 of 10 rounded is exactly 40%
        let table = create_table(ages(&[
            20.0, 25.0, 30.0, 35.0, 21.0, 22.0, 23.0, 24.0, 26.0, 27.0,
        ]));
        let issues = detect_age_patterns(&create_context(&table));

        assert!(issues.iter().all(|i| i.category != "Suspicious Age Rounding"));
    }

    #[test]
    fn test_age_clustering_requires_variety() {
        // 11 distinct ages, 31 repeated enough to pass 10%
        let mut values: Vec<f64> = (21..=31).map(f64::from).collect();
        values.extend([31.0, 31.0, 31.0]);
        let table = create_table(ages(&values));
        let issues = detect_age_patterns(&create_context(&table));

        let issue = issues
            .iter()
            .find(|i| i.category == "Excessive Age Clustering")
            .unwrap();
        assert_eq!(issue.count, 4);
        assert_eq!(issue.description, "Age 31 appears 4 times (28.6% of records)");

        // Only 3 distinct ages: no clustering issue however skewed
        let table = create_table(ages(&[33.0, 33.0, 33.0, 41.0, 42.0]));
        let issues = detect_age_patterns(&create_context(&table));
        assert!(issues.iter().all(|i| i.category != "Excessive Age Clustering"));
    }

    #[test]
    fn test_most_common_prefers_first_on_ties() {
        let groups = group_by_value(&[(0, 'b'), (1, 'a'), (2, 'a'), (3, 'b')]);
        assert_eq!(most_common(&groups).map(|g| g.value), Some('b'));
    }

    #[test]
    fn test_non_numeric_ages_are_ignored() {
        let table = create_table(vec![json!({"age": "unknown"}), json!({"age": null})]);
        assert!(detect_age_patterns(&create_context(&table)).is_empty());
    }

    #[test]
    fn test_new_years_clustering() {
        let table = create_table(vec![
            json!({"birth_date": "1980-01-01"}),
            json!({"birth_date": "1985-01-01"}),
            json!({"birth_date": "1990-07-14"}),
            json!({"birth_date": "1991-03-02"}),
            json!({"birth_date": "garbage"}),
        ]);
        let issues = detect_date_clustering(&create_context(&table));

        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(
            issue.category,
            "Suspicious Date Clustering - January 1st (birth_date)"
        );
        assert_eq!(
            issue.description,
            "50.0% of birth_date values are January 1st, suggesting default values"
        );
        assert_eq!(issue.affected_records, BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_single_date_clustering() {
        let mut rows: Vec<Value> = (1..=21)
            .map(|day| json!({ "hire_date": format!("2020-03-{:02}", day) }))
            .collect();
        rows.extend((0..4).map(|_| json!({"hire_date": "2020-03-15"})));
        let table = create_table(rows);

        let issues = detect_date_clustering(&create_context(&table));

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category, "Excessive Date Clustering (hire_date)");
        assert_eq!(
            issues[0].description,
            "Date 2020-03-15 appears 5 times (20.0% of records)"
        );
        assert_eq!(issues[0].count, 5);
    }

    #[test]
    fn test_age_clustering_distinct_boundary() {
        // 10 distinct ages, none a multiple of 5, 31 at 30%
        let mut values = vec![21.0, 22.0, 23.0, 24.0, 26.0, 27.0, 28.0, 29.0, 31.0, 32.0];
        values.extend([31.0, 31.0, 31.0]);
        let table = create_table(ages(&values));
        assert!(detect_age_patterns(&create_context(&table)).is_empty());

        // An 11th distinct age crosses the boundary
        values.push(33.0);
        let table = create_table(ages(&values));
        let issues = detect_age_patterns(&create_context(&table));

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category, "Excessive Age Clustering");
        assert_eq!(issues[0].description, "Age 31 appears 4 times (28.6% of records)");
    }

    #[test]
    fn test_single_date_clustering_needs_more_than_twenty_dates() {
        let mut rows: Vec<Value> = (1..=20)
            .map(|day| json!({ "hire_date": format!("2020-03-{:02}", day) }))
            .collect();
        rows.extend((0..10).map(|_| json!({"hire_date": "2020-03-15"})));
        let table = create_table(rows);

        assert!(detect_date_clustering(&create_context(&table)).is_empty());
    }

    #[test]
    fn test_new_years_and_single_date_clustering_together() {
        let mut rows: Vec<Value> = (1..=21)
            .map(|day| json!({ "birth_date": format!("1980-03-{:02}", day) }))
            .collect();
        rows.extend((0..6).map(|_| json!({"birth_date": "1980-01-01"})));
        let table = create_table(rows);

        let issues = detect_date_clustering(&create_context(&table));

        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[0].category,
            "Suspicious Date Clustering - January 1st (birth_date)"
        );
        assert_eq!(
            issues[0].description,
            "22.2% of birth_date values are January 1st, suggesting default values"
        );
        assert_eq!(issues[1].category, "Excessive Date Clustering (birth_date)");
        assert_eq!(
            issues[1].description,
            "Date 1980-01-01 appears 6 times (22.2% of records)"
        );
        assert_eq!(issues[0].affected_records, issues[1].affected_records);
        assert_eq!(issues[1].affected_records, (21..27).collect::<BTreeSet<_>>());
    }
}
