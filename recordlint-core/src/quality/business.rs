//! Business-rule and temporal consistency checks.
//!
//! All year arithmetic goes through [`crate::temporal`], so a year is
//! always 365.25 days long.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::table::{RecordIndex, as_number};
use crate::temporal::{round_to, years_between};

use super::config::thresholds::{
    AGE_TOLERANCE_YEARS, MAX_EMPLOYMENT_YEARS, MAX_RECORD_EXAMPLES, MIN_WORKING_AGE,
};
use super::context::DetectionContext;
use super::models::{Example, Issue};
use super::rules::{
    AGE_BIRTHDATE_MISMATCH, FUTURE_JOIN_DATES, JOIN_BEFORE_BIRTH, JOIN_BEFORE_FOUNDING,
    LONG_EMPLOYMENT, UNDERAGE_AT_JOIN,
};

/// Detects join dates in the future or before the company existed.
pub(crate) fn detect_join_date_violations(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let Some(founding) = NaiveDate::from_ymd_opt(ctx.company_founding_year, 1, 1) else {
        tracing::warn!(
            "Company founding year {} is not a valid calendar year",
            ctx.company_founding_year
        );
        return Vec::new();
    };

    let mut issues = Vec::new();
    for column in &ctx.columns.join_dates {
        let dates: Vec<(RecordIndex, NaiveDate)> = column.dates().collect();

        let future: BTreeSet<RecordIndex> = dates
            .iter()
            .filter(|(_, date)| *date > ctx.reference_date)
            .map(|(index, _)| *index)
            .collect();
        if !future.is_empty() {
            let examples = ctx.record_examples(&future, MAX_RECORD_EXAMPLES);
            issues.push(
                FUTURE_JOIN_DATES
                    .issue(
                        Some(column.name.as_str()),
                        format!(
                            "Found {} records with join dates in the future",
                            future.len()
                        ),
                        future,
                    )
                    .with_examples(examples),
            );
        }

        let early: BTreeSet<RecordIndex> = dates
            .iter()
            .filter(|(_, date)| *date < founding)
            .map(|(index, _)| *index)
            .collect();
        if !early.is_empty() {
            let examples = ctx.record_examples(&early, MAX_RECORD_EXAMPLES);
            issues.push(
                JOIN_BEFORE_FOUNDING
                    .issue(
                        Some(column.name.as_str()),
                        format!(
                            "Found {} records with join dates before company founding ({})",
                            early.len(),
                            ctx.company_founding_year
                        ),
                        early,
                    )
                    .with_examples(examples),
            );
        }
    }
    issues
}

/// Detects stated ages that disagree with the birth date.
///
/// The calculated age is rounded half to even, and a gap of up to one year
/// is tolerated to absorb birthday timing.
pub(crate) fn detect_age_birthdate_mismatch(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let (Some(age_column), Some(birth_column)) = (ctx.columns.age, ctx.columns.birth_date())
    else {
        tracing::debug!("Age or birth date column missing, skipping age consistency check");
        return Vec::new();
    };

    let mut mismatched = BTreeSet::new();
    let mut examples = Vec::new();

    for (index, birth_date) in birth_column.dates() {
        let Some(stated_age) = as_number(age_column.get(index)) else {
            continue;
        };
        let calculated_age = years_between(birth_date, ctx.reference_date).round_ties_even();
        let difference = (stated_age - calculated_age).abs();
        if difference <= AGE_TOLERANCE_YEARS {
            continue;
        }

        mismatched.insert(index);
        if examples.len() < MAX_RECORD_EXAMPLES {
            examples.push(Example::AgeMismatch {
                record_index: index,
                stated_age,
                calculated_age: calculated_age as i64,
                birthdate: birth_column.get(index).clone(),
                difference,
            });
        }
    }

    if mismatched.is_empty() {
        return Vec::new();
    }

    vec![
        AGE_BIRTHDATE_MISMATCH
            .issue(
                None,
                format!(
                    "Found {} records where stated age doesn't match calculated age from birthdate",
                    mismatched.len()
                ),
                mismatched,
            )
            .with_examples(examples),
    ]
}

/// Detects join dates before birth and employees hired before working age.
///
/// A join date before birth also counts as joining under working age, so
/// such records appear in both issues.
pub(crate) fn detect_birth_join_ordering(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let (Some(birth_column), Some(join_column)) =
        (ctx.columns.birth_date(), ctx.columns.join_date())
    else {
        tracing::debug!("Birth or join date column missing, skipping date ordering check");
        return Vec::new();
    };

    let births: HashMap<RecordIndex, NaiveDate> = birth_column.dates().collect();
    let pairs: Vec<(RecordIndex, NaiveDate, NaiveDate)> = join_column
        .dates()
        .filter_map(|(index, join)| births.get(&index).map(|birth| (index, *birth, join)))
        .collect();

    let mut issues = Vec::new();

    let impossible: BTreeSet<RecordIndex> = pairs
        .iter()
        .filter(|(_, birth, join)| join < birth)
        .map(|(index, _, _)| *index)
        .collect();
    if !impossible.is_empty() {
        let examples = ctx.record_examples(&impossible, MAX_RECORD_EXAMPLES);
        issues.push(
            JOIN_BEFORE_BIRTH
                .issue(
                    None,
                    format!(
                        "Found {} records where join date is before birth date",
                        impossible.len()
                    ),
                    impossible,
                )
                .with_examples(examples),
        );
    }

    let young: Vec<(RecordIndex, NaiveDate, NaiveDate, f64)> = pairs
        .iter()
        .map(|&(index, birth, join)| (index, birth, join, years_between(birth, join)))
        .filter(|(_, _, _, age_at_join)| *age_at_join < MIN_WORKING_AGE)
        .collect();
    if !young.is_empty() {
        let examples = young
            .iter()
            .take(MAX_RECORD_EXAMPLES)
            .map(|&(record_index, birth_date, join_date, age_at_join)| Example::AgeAtJoin {
                record_index,
                birth_date,
                join_date,
                age_at_join: round_to(age_at_join, 1),
            })
            .collect();
        issues.push(
            UNDERAGE_AT_JOIN
                .issue(
                    None,
                    format!(
                        "Found {} records where employees joined before age 16",
                        young.len()
                    ),
                    young.iter().map(|(index, ..)| *index).collect(),
                )
                .with_examples(examples),
        );
    }

    issues
}

/// Detects tenures longer than fifty years, measured on the first join column.
pub(crate) fn detect_long_employment(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let Some(join_column) = ctx.columns.join_date() else {
        tracing::debug!("No join date column, skipping employment duration check");
        return Vec::new();
    };

    let long: Vec<(RecordIndex, NaiveDate, f64)> = join_column
        .dates()
        .map(|(index, join)| (index, join, years_between(join, ctx.reference_date)))
        .filter(|(_, _, years)| *years > MAX_EMPLOYMENT_YEARS)
        .collect();
    if long.is_empty() {
        return Vec::new();
    }

    let examples = long
        .iter()
        .take(MAX_RECORD_EXAMPLES)
        .map(|&(record_index, join_date, years)| Example::EmploymentDuration {
            record_index,
            join_date,
            duration_years: round_to(years, 1),
        })
        .collect();

    vec![
        LONG_EMPLOYMENT
            .issue(
                None,
                format!(
                    "Found {} records with employment duration over 50 years",
                    long.len()
                ),
                long.iter().map(|(index, ..)| *index).collect(),
            )
            .with_examples(examples),
    ]
}
