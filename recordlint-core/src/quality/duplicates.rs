//! Duplicate identity detection.
//!
//! Emails and phone numbers are compared in normalized form, so
//! `John@X.com ` and `john@x.com` count as the same address.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use crate::table::RecordIndex;

use super::config::thresholds::{MAX_GROUP_EXAMPLES, MAX_GROUP_RECORDS};
use super::context::DetectionContext;
use super::models::{Example, Issue};
use super::rules::{CONTACT_OVERLAP, DUPLICATE_EMAILS, DUPLICATE_PHONES};

/// Records sharing one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValueGroup<K = String> {
    pub value: K,
    pub indices: Vec<RecordIndex>,
}

/// Groups records by value, keeping first-appearance order.
pub(crate) fn group_by_value<K>(values: &[(RecordIndex, K)]) -> Vec<ValueGroup<K>>
where
    K: Eq + Hash + Clone,
{
    let mut positions: HashMap<&K, usize> = HashMap::new();
    let mut groups: Vec<ValueGroup<K>> = Vec::new();

    for (index, value) in values {
        match positions.get(value) {
            Some(&position) => groups[position].indices.push(*index),
            None => {
                positions.insert(value, groups.len());
                groups.push(ValueGroup {
                    value: value.clone(),
                    indices: vec![*index],
                });
            }
        }
    }

    groups
}

/// Groups shared by more than one record, largest first.
///
/// The sort is stable, so equally sized groups stay in first-appearance order.
fn duplicate_groups(values: &[(RecordIndex, String)]) -> Vec<ValueGroup> {
    let mut duplicates: Vec<ValueGroup> = group_by_value(values)
        .into_iter()
        .filter(|g| g.indices.len() > 1)
        .collect();
    duplicates.sort_by(|a, b| b.indices.len().cmp(&a.indices.len()));
    duplicates
}

fn affected(groups: &[ValueGroup]) -> BTreeSet<RecordIndex> {
    groups
        .iter()
        .flat_map(|g| g.indices.iter().copied())
        .collect()
}

/// Detects email addresses used by more than one record.
pub(crate) fn detect_duplicate_emails(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let Some(column) = ctx.columns.email else {
        tracing::debug!("No email column, skipping duplicate email detection");
        return Vec::new();
    };

    let groups = duplicate_groups(&ctx.emails(column));
    if groups.is_empty() {
        return Vec::new();
    }

    let examples = groups
        .iter()
        .take(MAX_GROUP_EXAMPLES)
        .map(|g| Example::EmailGroup {
            email: g.value.clone(),
            count: g.indices.len(),
            records: ctx.table.snapshots(&g.indices, MAX_GROUP_RECORDS),
        })
        .collect();

    let issue = DUPLICATE_EMAILS
        .issue(
            None,
            format!(
                "Found {} email addresses used by multiple records",
                groups.len()
            ),
            affected(&groups),
        )
        .with_examples(examples);

    vec![issue]
}

/// Detects phone numbers used by more than one record, per phone column.
pub(crate) fn detect_duplicate_phones(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    if ctx.columns.phones.is_empty() {
        tracing::debug!("No phone columns, skipping duplicate phone detection");
    }

    let mut issues = Vec::new();
    for column in &ctx.columns.phones {
        let groups = duplicate_groups(&ctx.phones(column));
        if groups.is_empty() {
            continue;
        }

        let examples = groups
            .iter()
            .take(MAX_GROUP_EXAMPLES)
            .map(|g| Example::PhoneGroup {
                normalized_phone: g.value.clone(),
                count: g.indices.len(),
                records: ctx.table.snapshots(&g.indices, MAX_GROUP_RECORDS),
            })
            .collect();

        issues.push(
            DUPLICATE_PHONES
                .issue(
                    Some(column.name.as_str()),
                    format!(
                        "Found {} phone numbers used by multiple records",
                        groups.len()
                    ),
                    affected(&groups),
                )
                .with_examples(examples),
        );
    }
    issues
}

/// Detects records that share both an email and a phone number.
///
/// For each email held by several records, a phone column overlaps when
/// the records' non-absent phones collapse to exactly one number.
pub(crate) fn detect_contact_overlap(ctx: &DetectionContext<'_>) -> Vec<Issue> {
    let Some(email_column) = ctx.columns.email else {
        return Vec::new();
    };
    if ctx.columns.phones.is_empty() {
        tracing::debug!("No phone columns, skipping contact overlap detection");
        return Vec::new();
    }

    let email_groups: Vec<ValueGroup> = group_by_value(&ctx.emails(email_column))
        .into_iter()
        .filter(|g| g.indices.len() > 1)
        .collect();
    if email_groups.is_empty() {
        return Vec::new();
    }

    let phones_by_column: Vec<(&str, HashMap<RecordIndex, String>)> = ctx
        .columns
        .phones
        .iter()
        .map(|column| (column.name.as_str(), ctx.phones(column).into_iter().collect()))
        .collect();

    let mut overlaps = Vec::new();
    for group in &email_groups {
        for (column_name, phones) in &phones_by_column {
            let distinct: BTreeSet<&String> = group
                .indices
                .iter()
                .filter_map(|index| phones.get(index))
                .collect();
            if distinct.len() == 1
                && let Some(phone) = distinct.first()
            {
                overlaps.push(Example::ContactOverlap {
                    email: group.value.clone(),
                    phone: (*phone).clone(),
                    phone_column: (*column_name).to_string(),
                    record_count: group.indices.len(),
                    indices: group.indices.clone(),
                });
            }
        }
    }

    if overlaps.is_empty() {
        return Vec::new();
    }

    let affected_records: BTreeSet<RecordIndex> = overlaps
        .iter()
        .filter_map(|overlap| match overlap {
            Example::ContactOverlap { indices, .. } => Some(indices.iter().copied()),
            _ => None,
        })
        .flatten()
        .collect();

    let description = format!(
        "Found {} cases where multiple records share both email and phone",
        overlaps.len()
    );
    overlaps.truncate(MAX_GROUP_EXAMPLES);

    vec![
        CONTACT_OVERLAP
            .issue(None, description, affected_records)
            .with_examples(overlaps),
    ]
}
