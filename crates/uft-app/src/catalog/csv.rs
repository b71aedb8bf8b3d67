// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CSV operations.

use serde_json::Value;
use uft_core::paths;
use uft_core::{Category, Invocation, Operation, Outcome, ParameterSpec, Result};
use uft_document::{json, tabular};

const WRITE: &[ParameterSpec] =
    &[ParameterSpec::text("data", "Row to write (comma-separated)").non_empty()];
const APPEND: &[ParameterSpec] =
    &[ParameterSpec::text("data", "Row to append (comma-separated)").non_empty()];
const FILTER: &[ParameterSpec] = &[
    ParameterSpec::text("column", "Column name").non_empty(),
    ParameterSpec::text("value", "Value to match"),
];

pub static OPERATIONS: &[Operation] = &[
    Operation::new(Category::Csv, "read", "Read CSV", &[], read),
    Operation::new(Category::Csv, "write", "Write CSV", WRITE, write),
    Operation::new(Category::Csv, "append", "Append row", APPEND, append),
    Operation::new(Category::Csv, "toJson", "Convert to JSON", &[], to_json),
    Operation::new(Category::Csv, "filter", "Filter rows", FILTER, filter),
];

fn read(inv: &Invocation<'_>) -> Result<Outcome> {
    let rows = tabular::read_rows(inv.path())?;
    let lines = rows.iter().map(|row| row.join(", ")).collect();
    Ok(Outcome::report(format!("{} rows", rows.len())).with_details(lines))
}

/// Replaces the whole file with a single row.
fn write(inv: &Invocation<'_>) -> Result<Outcome> {
    let data = inv.args.text("data")?;
    let output = inv.in_place_output();
    tabular::write_row(&output, &tabular::parse_row(data), false)?;
    Ok(Outcome::written(output, "Row written"))
}

fn append(inv: &Invocation<'_>) -> Result<Outcome> {
    let data = inv.args.text("data")?;
    let output = inv.prepare_append()?;
    tabular::write_row(&output, &tabular::parse_row(data), true)?;
    Ok(Outcome::written(output, "Row appended"))
}

fn to_json(inv: &Invocation<'_>) -> Result<Outcome> {
    let value = tabular::to_json(inv.path())?;
    let count = value.as_array().map_or(0, Vec::len);
    let output = paths::derived(inv.path(), "", "json");
    json::write(&output, &value)?;
    Ok(Outcome::written(output, format!("Converted {count} records to JSON")))
}

fn filter(inv: &Invocation<'_>) -> Result<Outcome> {
    let column = inv.args.text("column")?;
    let value = inv.args.text("value")?;
    let rows = tabular::filter(inv.path(), column, value)?;
    let lines = rows
        .into_iter()
        .map(|row| Value::Object(row).to_string())
        .collect();
    Ok(Outcome::report(format!("Rows where {column} = {value}")).with_details(lines))
}
