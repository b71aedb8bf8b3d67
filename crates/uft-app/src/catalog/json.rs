// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON operations.

use serde_json::Value;
use uft_core::paths;
use uft_core::{Category, Invocation, Operation, Outcome, ParameterSpec, Result, UftError};
use uft_document::json;

const WRITE: &[ParameterSpec] = &[ParameterSpec::text("jsonString", "JSON to write").non_empty()];
const APPEND: &[ParameterSpec] =
    &[ParameterSpec::text("jsonString", "JSON to append").non_empty()];
const MERGE: &[ParameterSpec] =
    &[ParameterSpec::path_list("paths", "JSON files to merge, in order")];

pub static OPERATIONS: &[Operation] = &[
    Operation::new(Category::Json, "read", "Read JSON", &[], read),
    Operation::new(Category::Json, "write", "Write JSON", WRITE, write),
    Operation::new(Category::Json, "append", "Append to JSON", APPEND, append),
    Operation::new(Category::Json, "toCsv", "Convert to CSV", &[], to_csv),
    Operation::new(Category::Json, "prettyPrint", "Pretty print", &[], read),
    Operation::new(Category::Json, "merge", "Merge JSON files", MERGE, merge),
];

/// Backs both `read` and `prettyPrint`.
fn read(inv: &Invocation<'_>) -> Result<Outcome> {
    let value = json::read(inv.path())?;
    let lines = json::pretty(&value)?.lines().map(str::to_string).collect();
    Ok(Outcome::report(format!("{}", inv.path().display())).with_details(lines))
}

fn write(inv: &Invocation<'_>) -> Result<Outcome> {
    let value = json::parse(inv.args.text("jsonString")?)?;
    let output = inv.in_place_output();
    json::write(&output, &value)?;
    Ok(Outcome::written(output, "JSON written"))
}

fn append(inv: &Invocation<'_>) -> Result<Outcome> {
    let addition = json::parse(inv.args.text("jsonString")?)?;
    let mut root = json::read(inv.path())?;
    json::append(&mut root, addition)?;
    let output = inv.in_place_output();
    json::write(&output, &root)?;
    Ok(Outcome::written(output, "JSON appended"))
}

fn to_csv(inv: &Invocation<'_>) -> Result<Outcome> {
    let bytes = json::to_csv(&json::read(inv.path())?)?;
    let output = paths::derived(inv.path(), "", "csv");
    std::fs::write(&output, bytes).map_err(|e| UftError::io_at(&output, e))?;
    Ok(Outcome::written(output, "JSON converted to CSV"))
}

/// Skipped inputs are reported as details, not failures.
fn merge(inv: &Invocation<'_>) -> Result<Outcome> {
    let (items, warnings) = json::merge(inv.args.path_list("paths")?);
    if items.is_empty() {
        return Ok(Outcome::report("Nothing to merge").with_details(warnings));
    }
    let count = items.len();
    let output = paths::sibling(inv.path(), "merged_output.json");
    json::write(&output, &Value::Array(items))?;
    Ok(Outcome::written(output, format!("Merged {count} items")).with_details(warnings))
}

#[cfg(test)]
mod tests {
    use super::super::tests::{fixture_dir, run};
    use serde_json::json;
    use uft_core::error::FailureCause;
    use uft_core::{Category, ErrorKind, MapSource};

    #[test]
    fn write_then_read_round_trips() {
        let dir = fixture_dir();
        let path = dir.path().join("data.json");
        let report = run(
            Category::Json,
            "write",
            &path,
            MapSource::new().with("jsonString", r#"{"a":1,"b":[1,2,3]}"#),
        );
        assert!(report.success, "{report:?}");
        let read: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, json!({"b": [1, 2, 3], "a": 1}));

        let report = run(Category::Json, "read", &path, MapSource::new());
        assert!(report.details.iter().any(|line| line == "    \"a\": 1,"));
    }

    #[test]
    fn write_rejects_invalid_json() {
        let dir = fixture_dir();
        let path = dir.path().join("data.json");
        let report = run(
            Category::Json,
            "write",
            &path,
            MapSource::new().with("jsonString", "{oops"),
        );
        assert_eq!(
            report.error_kind,
            Some(ErrorKind::HandlerFailure(FailureCause::InvalidJson))
        );
        assert!(!path.exists());
    }

    #[test]
    fn append_to_scalar_is_unsupported() {
        let dir = fixture_dir();
        let path = dir.path().join("n.json");
        std::fs::write(&path, "42").unwrap();
        let report = run(
            Category::Json,
            "append",
            &path,
            MapSource::new().with("jsonString", "1"),
        );
        assert_eq!(
            report.error_kind,
            Some(ErrorKind::HandlerFailure(FailureCause::UnsupportedStructure))
        );
    }

    #[test]
    fn merge_skips_non_arrays_with_warning() {
        let dir = fixture_dir();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        std::fs::write(&a, "[1]").unwrap();
        std::fs::write(&b, r#"{"k": 1}"#).unwrap();
        let report = run(
            Category::Json,
            "merge",
            &a,
            MapSource::new().with("paths", format!("{},{}", a.display(), b.display())),
        );
        assert!(report.success, "{report:?}");
        assert_eq!(report.details.len(), 1);
        let merged = std::fs::read_to_string(dir.path().join("merged_output.json")).unwrap();
        assert_eq!(serde_json::from_str::<serde_json::Value>(&merged).unwrap(), json!([1]));
    }

    #[test]
    fn to_csv_writes_sibling() {
        let dir = fixture_dir();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, r#"[{"x": 1, "y": "a"}, {"x": 2, "y": "b"}]"#).unwrap();
        let report = run(Category::Json, "toCsv", &path, MapSource::new());
        assert!(report.success, "{report:?}");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("rows.csv")).unwrap(),
            "x,y\n1,a\n2,b\n"
        );
    }
}
