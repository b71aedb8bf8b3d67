// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report and menu rendering for stdout.

use std::fmt::Write as _;

use uft_core::{Category, ExecutionReport, Registry};

use crate::prompt::prompt_text;

pub fn print_report(report: &ExecutionReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", format_report(report));
    }
    Ok(())
}

pub fn format_report(report: &ExecutionReport) -> String {
    let mut out = String::new();
    if report.success {
        let _ = writeln!(out, "{}: {}", report.operation, report.message);
        for path in &report.outputs {
            let _ = writeln!(out, "  -> {}", path.display());
        }
        for line in &report.details {
            let _ = writeln!(out, "  {line}");
        }
    } else {
        let kind = report
            .error_kind
            .map(|kind| kind.to_string())
            .unwrap_or_default();
        let _ = writeln!(out, "{} failed [{kind}]: {}", report.operation, report.message);
        if let Some(hint) = &report.hint {
            let _ = writeln!(out, "  hint: {hint}");
        }
    }
    out
}

/// `--list` output: ids in menu order with their parameters.
pub fn format_operations(registry: &Registry, category: Category) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{category} operations:");
    for op in registry.list_operations(category) {
        let _ = writeln!(out, "  {:<22}{}", op.id, op.label);
        for spec in op.parameters {
            let _ = writeln!(out, "      {}: {}", spec.name, prompt_text(spec));
        }
    }
    out
}
