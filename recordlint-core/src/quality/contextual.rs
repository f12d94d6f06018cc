//! Contextual integrity checks.
//!
//! These detectors judge values against the rest of the table rather than
//! in isolation: a hiring month is only suspicious next to quieter months.

use std::collections::{BTreeMap, BTreeSet};

use crate::table::{Column, RecordIndex};
use crate::temporal::{YearMonth, round_to};

use super::config::thresholds::{
    MAX_GROUP_EXAMPLES, MAX_GROUP_RECORDS, MAX_RECORD_EXAMPLES, MAX_WORKING_AGE,
    MIN_WORKING_AGE, SPIKE_STD_DEVS,
};
use super::context::DetectionContext;
use super::models::{Example, Issue};
use super::rules::{AGE_TOO_OLD, AGE_TOO_YOUNG, BULK_IMPORT};

/// Mean and sample standard deviation (n - 1).
///
/// Returns `None` with fewer than two values, where the sample deviation
/// is undefined.
pub(crate) fn mean_and_sample_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some((mean, variance.sqrt()))
}

/// Detects months with unusually many join events, per join column.
pub(crate) fn detect_bulk_imports(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    ctx.columns
        .join_dates
        .iter()
        .filter_map(|column| check_bulk_import(ctx, column))
        .collect()
}

fn check_bulk_import(ctx: &DetectionContext<'_>, column: &Column) -> Option<Issue> {
    let mut months: BTreeMap<YearMonth, Vec<RecordIndex>> = BTreeMap::new();
    let mut total_dates = 0usize;
    for (index, date) in column.dates() {
        months.entry(YearMonth::from(date)).or_default().push(index);
        total_dates += 1;
    }

    let counts: Vec<f64> = months.values().map(|indices| indices.len() as f64).collect();
    let Some((mean, std)) = mean_and_sample_std(&counts) else {
        tracing::debug!(
            "Column '{}' spans fewer than two months, skipping bulk import detection",
            column.name
        );
        return None;
    };
    let threshold = mean + SPIKE_STD_DEVS * std;

    let spikes: Vec<(&YearMonth, &Vec<RecordIndex>)> = months
        .iter()
        .filter(|(_, indices)| indices.len() as f64 > threshold)
        .collect();
    if spikes.is_empty() {
        return None;
    }

    let spike_total: usize = spikes.iter().map(|(_, indices)| indices.len()).sum();
    let affected: BTreeSet<RecordIndex> = spikes
        .iter()
        .flat_map(|(_, indices)| indices.iter().copied())
        .collect();
    let examples = spikes
        .iter()
        .take(MAX_GROUP_EXAMPLES)
        .map(|(period, indices)| Example::SpikeMonth {
            period: period.to_string(),
            count: indices.len(),
            percentage_of_total: round_to(
                indices.len() as f64 / total_dates as f64 * 100.0,
                1,
            ),
            sample_records: ctx.table.snapshots(indices.iter(), MAX_GROUP_RECORDS),
        })
        .collect();

    tracing::debug!(
        "Column '{}': {} spike months above {:.2} events per month",
        column.name,
        spikes.len(),
        threshold
    );

    Some(
        BULK_IMPORT
            .issue(
                Some(column.name.as_str()),
                format!(
                    "Detected {} months with unusually high {} activity, suggesting bulk imports",
                    spikes.len(),
                    column.name
                ),
                affected,
            )
            .with_examples(examples)
            .with_count(spike_total),
    )
}

/// Detects ages outside the plausible working range.
pub(crate) fn detect_age_ranges(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let Some(column) = ctx.columns.age else {
        return Vec::new();
    };

    let mut too_young = BTreeSet::new();
    let mut too_old = BTreeSet::new();
    for (index, age) in column.numbers() {
        if age < MIN_WORKING_AGE {
            too_young.insert(index);
        } else if age > MAX_WORKING_AGE {
            too_old.insert(index);
        }
    }

    let mut issues = Vec::new();
    if !too_young.is_empty() {
        let examples = ctx.record_examples(&too_young, MAX_RECORD_EXAMPLES);
        issues.push(
            AGE_TOO_YOUNG
                .issue(
                    None,
                    format!("Found {} records with ages under 16", too_young.len()),
                    too_young,
                )
                .with_examples(examples),
        );
    }
    if !too_old.is_empty() {
        let examples = ctx.record_examples(&too_old, MAX_RECORD_EXAMPLES);
        issues.push(
            AGE_TOO_OLD
                .issue(
                    None,
                    format!("Found {} records with ages over 80", too_old.len()),
                    too_old,
                )
                .with_examples(examples),
        );
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::context::test_support::{create_context, create_table};
    use crate::quality::models::Severity;
    use serde_json::{Value, json};

    fn hires(months: &[(&str, usize)]) -> Vec<Value> {
        months
            .iter()
            .flat_map(|(month, n)| (0..*n).map(move |_| json!({ "join_date": format!("{}-10", month) })))
            .collect()
    }

    #[test]
    fn test_mean_and_sample_std() {
        let (mean, std) = mean_and_sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((mean - 5.0).abs() < 1e-9);
        assert!((std - 2.138_089_935).abs() < 1e-6);

        assert!(mean_and_sample_std(&[3.0]).is_none());
        assert!(mean_and_sample_std(&[]).is_none());
    }

    #[test]
    fn test_bulk_import_spike() {
        let mut months: Vec<(String, usize)> = (1..=12)
            .map(|m| (format!("2019-{:02}", m), 1))
            .collect();
        months.push(("2020-03".to_string(), 30));
        let months: Vec<(&str, usize)> = months.iter().map(|(m, n)| (m.as_str(), *n)).collect();
        let table = create_table(hires(&months));

        let issues = detect_bulk_imports(&create_context(&table));

        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.category, "Bulk Import Pattern Detection (join_date)");
        assert_eq!(issue.severity, Severity::Low);
        assert_eq!(issue.count, 30);
        assert_eq!(
            issue.description,
            "Detected 1 months with unusually high join_date activity, suggesting bulk imports"
        );
        assert_eq!(issue.affected_records.len(), 30);

        let Example::SpikeMonth {
            period,
            count,
            percentage_of_total,
            sample_records,
        } = &issue.examples[0]
        else {
            panic!("unexpected example shape");
        };
        assert_eq!(period, "2020-03");
        assert_eq!(*count, 30);
        assert_eq!(*percentage_of_total, 71.4);
        assert_eq!(sample_records.len(), MAX_GROUP_RECORDS);
    }

    #[test]
    fn test_spike_share_rounds_half_to_even() {
        // 30 quiet months and one month with 2 of 32 hires: 6.25% of the total.
        let mut months: Vec<(String, usize)> = (0..30)
            .map(|i| (format!("{}-{:02}", 2019 + i / 12, i % 12 + 1), 1))
            .collect();
        months.push(("2021-07".to_string(), 2));
        let months: Vec<(&str, usize)> = months.iter().map(|(m, n)| (m.as_str(), *n)).collect();
        let table = create_table(hires(&months));

        let issues = detect_bulk_imports(&create_context(&table));

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].count, 2);
        let Example::SpikeMonth {
            period,
            percentage_of_total,
            ..
        } = &issues[0].examples[0]
        else {
            panic!("unexpected example shape");
        };
        assert_eq!(period, "2021-07");
        assert_eq!(*percentage_of_total, 6.2);
    }

    #[test]
    fn test_uniform_months_have_no_spike() {
        let table = create_table(hires(&[("2021-01", 3), ("2021-02", 3), ("2021-03", 3)]));
        assert!(detect_bulk_imports(&create_context(&table)).is_empty());
    }

    #[test]
    fn test_single_month_is_skipped() {
        let table = create_table(hires(&[("2021-01", 50)]));
        assert!(detect_bulk_imports(&create_context(&table)).is_empty());
    }

    #[test]
    fn test_age_ranges() {
        let table = create_table(vec![
            json!({"age": 12}),
            json!({"age": 16}),
            json!({"age": 80}),
            json!({"age": 93}),
            json!({"age": "15"}),
        ]);
        let issues = detect_age_ranges(&create_context(&table));

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].category, "Unreasonably Young Ages");
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].affected_records, BTreeSet::from([0, 4]));
        assert_eq!(issues[1].category, "Unreasonably Old Ages");
        assert_eq!(issues[1].severity, Severity::Medium);
        assert_eq!(issues[1].affected_records, BTreeSet::from([3]));
    }
}
