//! Column classification by name.
//!
//! Detectors never look at column names themselves; they receive a
//! [`ColumnMap`] built once per run.

use serde::{Deserialize, Serialize};

use crate::table::{Column, Table};

/// Names that mark a birth date column even without the word "date".
const BIRTH_DATE_NAMES: &[&str] = &["dob", "birth_date", "birthdate"];

/// The semantic role of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// The `email` column
    Email,
    /// The `age` column
    Age,
    /// Any column mentioning "phone"
    Phone,
    /// A column mentioning "birth" or "dob"
    BirthDate,
    /// A column mentioning "join", "hire" or "start"
    JoinDate,
    /// Any other column mentioning "date"
    Date,
}

/// Returns true for the column literally named `email`.
pub fn is_email_column(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case("email")
}

/// Returns true for the column literally named `age`.
pub fn is_age_column(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case("age")
}

/// Returns true for columns holding phone numbers.
pub fn is_phone_column(name: &str) -> bool {
    name.to_lowercase().contains("phone")
}

/// Returns true for columns holding birth dates.
pub fn is_birth_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("birth") || lower.contains("dob")
}

/// Returns true for columns holding join, hire or start dates.
pub fn is_join_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    ["join", "hire", "start"].iter().any(|k| lower.contains(k))
}

/// Returns true for columns examined for date clustering.
pub fn is_date_like(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("date") || BIRTH_DATE_NAMES.contains(&lower.as_str())
}

/// Primary role of a column name, for display and listing.
///
/// A name can satisfy several predicates; only the most specific role is
/// returned, in the order email, age, phone, birth date, join date, date.
/// `hire_date` is therefore [`ColumnRole::JoinDate`] here even though it is
/// also date-like. Detectors do not use this function: they read
/// [`ColumnMap::from_table`], which records every role a column has.
pub fn classify_column(name: &str) -> Option<ColumnRole> {
    if is_email_column(name) {
        Some(ColumnRole::Email)
    } else if is_age_column(name) {
        Some(ColumnRole::Age)
    } else if is_phone_column(name) {
        Some(ColumnRole::Phone)
    } else if is_birth_column(name) {
        Some(ColumnRole::BirthDate)
    } else if is_join_column(name) {
        Some(ColumnRole::JoinDate)
    } else if is_date_like(name) {
        Some(ColumnRole::Date)
    } else {
        None
    }
}

/// Columns of a table grouped by what the detectors use them for.
///
/// Each list keeps the table's column order. A column may appear in more
/// than one list, e.g. `birth_date` is both birth-like and date-like.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap<'a> {
    /// First column named `email`
    pub email: Option<&'a Column>,
    /// First column named `age`
    pub age: Option<&'a Column>,
    /// Columns whose name contains `phone`
    pub phones: Vec<&'a Column>,
    /// Birth date columns
    pub birth_dates: Vec<&'a Column>,
    /// Join, hire and start date columns
    pub join_dates: Vec<&'a Column>,
    /// Columns checked for date clustering
    pub date_like: Vec<&'a Column>,
}

impl<'a> ColumnMap<'a> {
    /// Classifies every column of a table.
    pub fn from_table(table: &'a Table) -> Self {
        let mut map = Self::default();
        for column in table.columns() {
            let name = column.name.as_str();
            if map.email.is_none() && is_email_column(name) {
                map.email = Some(column);
            }
            if map.age.is_none() && is_age_column(name) {
                map.age = Some(column);
            }
            if is_phone_column(name) {
                map.phones.push(column);
            }
            if is_birth_column(name) {
                map.birth_dates.push(column);
            }
            if is_join_column(name) {
                map.join_dates.push(column);
            }
            if is_date_like(name) {
                map.date_like.push(column);
            }
        }
        map
    }

    /// The birth-like column used for cross-field checks.
    pub fn birth_date(&self) -> Option<&'a Column> {
        self.birth_dates.first().copied()
    }

    /// The join-like column used for cross-field checks.
    pub fn join_date(&self) -> Option<&'a Column> {
        self.join_dates.first().copied()
    }
}
