// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CSV files through the `csv` crate. The first row of a file is its header
// wherever records are keyed by column.

use std::fs::OpenOptions;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, instrument};
use uft_core::error::{Result, UftError};

fn csv_err(path: &Path, err: csv::Error) -> UftError {
    if let csv::ErrorKind::Io(io) = err.kind()
        && io.kind() == std::io::ErrorKind::NotFound
    {
        return UftError::NotFound(path.to_path_buf());
    }
    UftError::Csv(format!("{}: {err}", path.display()))
}

/// Every row as raw fields. Rows may differ in length.
#[instrument]
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;
    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| csv_err(path, e))
        })
        .collect::<Result<Vec<Vec<String>>>>()?;
    debug!(rows = rows.len(), "CSV read");
    Ok(rows)
}

/// Split user input on commas into one row's fields.
pub fn parse_row(data: &str) -> Vec<&str> {
    data.split(',').collect()
}

/// Write one row, replacing the file (`append == false`) or adding to it.
#[instrument(skip(fields))]
pub fn write_row(path: &Path, fields: &[&str], append: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .map_err(|e| UftError::io_at(path, e))?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(fields).map_err(|e| csv_err(path, e))?;
    writer.flush().map_err(|e| UftError::io_at(path, e))?;
    Ok(())
}

/// Records keyed by header, values kept as strings.
///
/// Short rows get an empty string for each missing column. Fields past the
/// last header are dropped.
#[instrument]
pub fn read_records(path: &Path) -> Result<Vec<Map<String, Value>>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;
    let headers = reader.headers().map_err(|e| csv_err(path, e))?.clone();
    reader
        .records()
        .map(|record| {
            let record = record.map_err(|e| csv_err(path, e))?;
            Ok(headers
                .iter()
                .enumerate()
                .map(|(i, key)| {
                    let value = record.get(i).unwrap_or_default();
                    (key.to_string(), Value::String(value.to_string()))
                })
                .collect())
        })
        .collect()
}

/// The whole file as a JSON array of objects.
pub fn to_json(path: &Path) -> Result<Value> {
    let records = read_records(path)?;
    Ok(Value::Array(records.into_iter().map(Value::Object).collect()))
}

/// Records whose `column` equals `value` exactly.
///
/// Fails when the header has no such column, so a typo is not mistaken for
/// "no matches".
#[instrument]
pub fn filter(path: &Path, column: &str, value: &str) -> Result<Vec<Map<String, Value>>> {
    let records = read_records(path)?;
    if let Some(first) = records.first()
        && !first.contains_key(column)
    {
        return Err(UftError::Csv(format!("no column named '{column}'")));
    }
    Ok(records
        .into_iter()
        .filter(|record| record.get(column).and_then(Value::as_str) == Some(value))
        .collect())
}
