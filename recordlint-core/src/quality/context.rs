//! Shared, read-only state handed to every detector.

use chrono::NaiveDate;
use phonenumber::country;

use crate::table::{Column, RecordIndex, Table};

use super::columns::ColumnMap;
use super::config::ValidatorConfig;
use super::models::Example;
use super::normalize::{normalize_email, normalize_phone};

/// Everything a detector may read during one run.
///
/// The reference date and phone region are resolved once, so every detector
/// agrees on what "today" is.
#[derive(Debug)]
pub(crate) struct DetectionContext<'a> {
    pub table: &'a Table,
    pub columns: ColumnMap<'a>,
    pub reference_date: NaiveDate,
    pub company_founding_year: i32,
    pub phone_region: Option<country::Id>,
}

impl<'a> DetectionContext<'a> {
    pub fn new(table: &'a Table, config: &ValidatorConfig) -> Self {
        let phone_region = config.region_id();
        if phone_region.is_none() {
            tracing::warn!(
                "Unknown phone region '{}', phone numbers will be compared by digits only",
                config.phone_region
            );
        }

        Self {
            table,
            columns: ColumnMap::from_table(table),
            reference_date: config.resolve_reference_date(),
            company_founding_year: config.company_founding_year,
            phone_region,
        }
    }

    /// Normalized emails of a column, absent values skipped.
    pub fn emails(&self, column: &Column) -> Vec<(RecordIndex, String)> {
        column
            .texts()
            .filter_map(|(index, raw)| normalize_email(&raw).map(|e| (index, e)))
            .collect()
    }

    /// Normalized phone numbers of a column, absent values skipped.
    pub fn phones(&self, column: &Column) -> Vec<(RecordIndex, String)> {
        column
            .texts()
            .filter_map(|(index, raw)| {
                normalize_phone(&raw, self.phone_region).map(|p| (index, p))
            })
            .collect()
    }

    /// Full-record examples for the first `limit` indices.
    pub fn record_examples<'i, I>(&self, indices: I, limit: usize) -> Vec<Example>
    where
        I: IntoIterator<Item = &'i RecordIndex>,
    {
        self.table
            .snapshots(indices, limit)
            .into_iter()
            .map(Example::Record)
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::Value;

    use super::*;

    /// Reference date used by detector unit tests.
    pub fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    pub fn create_table(rows: Vec<Value>) -> Table {
        Table::from_rows(&rows).unwrap()
    }

    pub fn create_context(table: &Table) -> DetectionContext<'_> {
        let config = ValidatorConfig::new().with_reference_date(reference_date());
        DetectionContext::new(table, &config)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_resolves_configuration_once() {
        let table = create_table(vec![json!({"email": "a@x.com"})]);
        let context = create_context(&table);

        assert_eq!(context.reference_date, reference_date());
        assert_eq!(context.company_founding_year, 1990);
        assert_eq!(context.phone_region, Some(country::Id::US));
        assert!(context.columns.email.is_some());
    }

    #[test]
    fn test_unknown_region_disables_parsing() {
        let table = create_table(vec![json!({"phone": "555-123-4567"})]);
        let config = ValidatorConfig::new().with_phone_region("ZZZ");
        let context = DetectionContext::new(&table, &config);

        assert!(context.phone_region.is_none());
        let phones = context.phones(&table.columns()[0]);
        assert_eq!(phones, vec![(0, "5551234567".to_string())]);
    }

    #[test]
    fn test_emails_skip_absent_values() {
        let table = create_table(vec![
            json!({"email": " A@X.com"}),
            json!({"email": null}),
            json!({"email": "  "}),
        ]);
        let context = create_context(&table);

        let emails = context.emails(&table.columns()[0]);
        assert_eq!(emails, vec![(0, "a@x.com".to_string())]);
    }
}
