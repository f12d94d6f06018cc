//! CSV ingestion into a [`Table`].
//!
//! The first row holds column names. Cells are typed by inference: empty
//! cells are absent, then integers, then finite floats, then text.

use std::io::Read;
use std::path::Path;

use recordlint_core::{Column, RecordLintError, Result, Table};
use serde_json::{Number, Value};

/// Reads a CSV file into a table.
///
/// # Errors
/// Returns an error if the file cannot be opened, a row cannot be parsed,
/// or rows have differing field counts.
pub(crate) fn read_table(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).map_err(|e| {
        RecordLintError::io(format!("Failed to open {}", path.display()), e)
    })?;
    read_table_from(file)
        .map_err(|e| match e {
            RecordLintError::Csv { context, source } => RecordLintError::Csv {
                context: format!("{} in {}", context, path.display()),
                source,
            },
            other => other,
        })
}

/// Reads CSV data from any reader into a table.
pub(crate) fn read_table_from<R: Read>(reader: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| RecordLintError::csv("Failed to read header row", e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for (row, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| RecordLintError::csv(format!("Failed to parse record {}", row + 1), e))?;
        for (column, field) in cells.iter_mut().zip(record.iter()) {
            column.push(infer_cell(field));
        }
    }

    tracing::debug!(
        "Read {} records with {} columns",
        cells.first().map_or(0, Vec::len),
        headers.len()
    );

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Table::new(columns)
}

/// Infers a typed cell from raw CSV text.
pub(crate) fn infer_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Value::from(integer);
    }
    if let Ok(float) = trimmed.parse::<f64>()
        && let Some(number) = Number::from_f64(float)
    {
        return Value::Number(number);
    }
    Value::String(raw.to_string())
}
