//! Column-oriented table of records.
//!
//! A [`Table`] is the only input of a validation run. Cells are
//! `serde_json::Value`s so any upstream reader (CSV, JSON, a database row
//! stream) can hand over data without agreeing on a type system first.
//! Records are addressed by their zero-based position, the record index.

use std::collections::HashSet;
use std::ops::Range;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RecordLintError, Result};
use crate::temporal;

/// Position of a record within its table.
pub type RecordIndex = usize;

static NULL: Value = Value::Null;

/// A named column holding one cell per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name as supplied by the caller
    pub name: String,
    /// One cell per record index
    pub values: Vec<Value>,
}

impl Column {
    /// Creates a new column.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Returns the cell for a record, or `Null` when out of range.
    pub fn get(&self, index: RecordIndex) -> &Value {
        self.values.get(index).unwrap_or(&NULL)
    }

    /// Iterates over every cell with its record index.
    pub fn cells(&self) -> impl Iterator<Item = (RecordIndex, &Value)> {
        self.values.iter().enumerate()
    }

    /// Iterates over the cells that hold a finite number.
    ///
    /// Non-numeric cells are skipped rather than reported.
    pub fn numbers(&self) -> impl Iterator<Item = (RecordIndex, f64)> + '_ {
        self.cells()
            .filter_map(|(index, value)| as_number(value).map(|n| (index, n)))
    }

    /// Iterates over the cells that parse as calendar dates.
    pub fn dates(&self) -> impl Iterator<Item = (RecordIndex, NaiveDate)> + '_ {
        self.cells()
            .filter_map(|(index, value)| temporal::parse_date(value).map(|d| (index, d)))
    }

    /// Iterates over the non-absent cells rendered as text.
    pub fn texts(&self) -> impl Iterator<Item = (RecordIndex, String)> + '_ {
        self.cells()
            .filter_map(|(index, value)| as_text(value).map(|s| (index, s)))
    }
}

/// A record rendered for display in issue examples.
///
/// Field names are serialized next to `record_index`, so a snapshot reads
/// like the input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    /// Record index of the row
    pub record_index: RecordIndex,
    /// Column name to cell value
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

/// Rectangular, read-only table of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Builds a table from columns.
    ///
    /// # Errors
    /// Returns [`RecordLintError::Table`] when column lengths differ or a
    /// column name appears twice.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, |c| c.values.len());

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(RecordLintError::table(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
            if column.values.len() != row_count {
                return Err(RecordLintError::table(format!(
                    "column '{}' has {} values, expected {}",
                    column.name,
                    column.values.len(),
                    row_count
                )));
            }
        }

        Ok(Self { columns, row_count })
    }

    /// Builds a table from row objects such as `{"email": "a@x.com", "age": 31}`.
    ///
    /// Columns appear in order of first appearance across rows; keys missing
    /// from a row become `Null` cells.
    ///
    /// # Errors
    /// Returns [`RecordLintError::Table`] if any row is not a JSON object.
    pub fn from_rows(rows: &[Value]) -> Result<Self> {
        let mut names: Vec<String> = Vec::new();
        let mut known: HashSet<String> = HashSet::new();

        for (index, row) in rows.iter().enumerate() {
            let Some(object) = row.as_object() else {
                return Err(RecordLintError::table(format!(
                    "row {} is not an object",
                    index
                )));
            };
            for key in object.keys() {
                if known.insert(key.clone()) {
                    names.push(key.clone());
                }
            }
        }

        let columns = names
            .into_iter()
            .map(|name| {
                let values = rows
                    .iter()
                    .map(|row| row.get(&name).cloned().unwrap_or(Value::Null))
                    .collect();
                Column::new(name, values)
            })
            .collect();

        Self::new(columns)
    }

    /// Number of records.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns true if the table has no records.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// All record indices in order.
    pub fn record_indices(&self) -> Range<RecordIndex> {
        0..self.row_count
    }

    /// Columns in their original order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in their original order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Looks up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Renders one record with all of its fields.
    pub fn snapshot(&self, index: RecordIndex) -> RecordSnapshot {
        let fields = self
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.get(index).clone()))
            .collect();

        RecordSnapshot {
            record_index: index,
            fields,
        }
    }

    /// Renders at most `limit` records, in the order given.
    pub fn snapshots<'a, I>(&self, indices: I, limit: usize) -> Vec<RecordSnapshot>
    where
        I: IntoIterator<Item = &'a RecordIndex>,
    {
        indices
            .into_iter()
            .take(limit)
            .map(|&index| self.snapshot(index))
            .collect()
    }
}

/// Returns true for cells that carry no value: `Null` or blank strings.
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Extracts a finite numeric value from a cell.
///
/// Numeric strings are accepted since most upstream readers deliver text.
/// Non-finite values such as "NaN" or "inf" are rejected so they cannot
/// poison statistics.
pub fn as_number(value: &Value) -> Option<f64> {
    let numeric = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match numeric {
        Some(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Renders a non-absent cell as text.
///
/// Whole floats print without a fractional part so that a phone number
/// read as `5551234567.0` compares equal to `"5551234567"`.
pub fn as_text(value: &Value) -> Option<String> {
    if is_absent(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{:.0}", f)),
            _ => Some(n.to_string()),
        },
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
