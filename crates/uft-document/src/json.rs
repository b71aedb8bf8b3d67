// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON documents: parse, pretty-print with a 4-space indent (key order kept),
// append, merge and flatten to CSV.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};
use uft_core::error::{Result, UftError};

/// Parse a JSON string supplied by the user.
pub fn parse(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Read and parse a JSON file.
pub fn read(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|e| UftError::io_at(path, e))?;
    parse(&text)
}

/// Pretty-print with 4-space indentation.
pub fn pretty(value: &Value) -> Result<String> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|e| UftError::Other(e.to_string()))
}

/// Write `value` pretty-printed, replacing the file.
pub fn write(path: &Path, value: &Value) -> Result<()> {
    let text = pretty(value)?;
    std::fs::write(path, text).map_err(|e| UftError::io_at(path, e))
}

/// Add `addition` to `root`: pushed onto an array, or shallow-merged into an
/// object (which then requires `addition` to be an object too).
pub fn append(root: &mut Value, addition: Value) -> Result<()> {
    match root {
        Value::Array(items) => {
            items.push(addition);
            Ok(())
        }
        Value::Object(map) => match addition {
            Value::Object(extra) => {
                map.extend(extra);
                Ok(())
            }
            other => Err(UftError::UnsupportedStructure(format!(
                "cannot merge {} into an object",
                type_name(&other)
            ))),
        },
        other => Err(UftError::UnsupportedStructure(format!(
            "cannot append to {}",
            type_name(other)
        ))),
    }
}

/// Concatenate the root arrays of `paths`. Files that are unreadable or whose
/// root is not an array are skipped; one warning line is returned for each.
#[instrument(skip_all, fields(files = paths.len()))]
pub fn merge(paths: &[PathBuf]) -> (Vec<Value>, Vec<String>) {
    let mut merged = Vec::new();
    let mut warnings = Vec::new();
    for path in paths {
        match read(path) {
            Ok(Value::Array(items)) => merged.extend(items),
            Ok(other) => {
                let message = format!(
                    "{} contains {}, not an array; skipped",
                    path.display(),
                    type_name(&other)
                );
                warn!("{message}");
                warnings.push(message);
            }
            Err(err) => {
                let message = format!("{}: {err}; skipped", path.display());
                warn!("{message}");
                warnings.push(message);
            }
        }
    }
    info!(items = merged.len(), skipped = warnings.len(), "JSON merged");
    (merged, warnings)
}

/// Flatten a non-empty array of objects sharing the same keys into CSV.
/// Columns follow the key order of the first object.
pub fn to_csv(root: &Value) -> Result<Vec<u8>> {
    let rows = match root {
        Value::Array(items) if !items.is_empty() => items,
        Value::Array(_) => {
            return Err(UftError::UnsupportedStructure("array is empty".into()));
        }
        other => {
            return Err(UftError::UnsupportedStructure(format!(
                "root is {}, expected an array of objects",
                type_name(other)
            )));
        }
    };
    let objects = rows
        .iter()
        .map(|row| match row {
            Value::Object(map) => Ok(map),
            other => Err(UftError::UnsupportedStructure(format!(
                "array element is {}, expected an object",
                type_name(other)
            ))),
        })
        .collect::<Result<Vec<&Map<String, Value>>>>()?;

    let header: Vec<&String> = objects[0].keys().collect();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&header)
        .map_err(|e| UftError::Csv(e.to_string()))?;
    for (index, object) in objects.iter().enumerate() {
        if object.len() != header.len() || header.iter().any(|key| !object.contains_key(*key)) {
            return Err(UftError::UnsupportedStructure(format!(
                "element {index} does not have the same keys as the first element"
            )));
        }
        let record: Vec<String> = header.iter().map(|key| cell(&object[key.as_str()])).collect();
        writer
            .write_record(&record)
            .map_err(|e| UftError::Csv(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| UftError::Csv(e.to_string()))
}

/// CSV cell text: strings verbatim, null empty, everything else as JSON.
fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
