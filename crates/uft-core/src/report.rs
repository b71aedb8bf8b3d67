// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Execution reports: the structured outcome of one dispatched operation.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{ErrorKind, UftError};
use crate::human_errors;
use crate::registry::Outcome;
use crate::types::Category;

/// Result of one operation, successful or not. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub operation: String,
    pub category: Category,
    pub success: bool,
    /// Files produced or mutated, in the order the handler reported them.
    pub outputs: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ExecutionReport {
    pub fn succeeded(operation: &str, category: Category, outcome: Outcome) -> Self {
        Self {
            operation: operation.to_string(),
            category,
            success: true,
            outputs: outcome.outputs,
            error_kind: None,
            message: outcome.summary,
            details: outcome.details,
            hint: None,
        }
    }

    pub fn failed(operation: &str, category: Category, err: &UftError) -> Self {
        Self {
            operation: operation.to_string(),
            category,
            success: false,
            outputs: Vec::new(),
            error_kind: Some(err.kind()),
            message: err.to_string(),
            details: Vec::new(),
            hint: Some(human_errors::hint(err)),
        }
    }

    /// Exit status for single-shot CLI use.
    pub fn exit_code(&self) -> u8 {
        if self.success { 0 } else { 1 }
    }
}
