// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operation registry: (category, operation id) -> descriptor + handler.
//
// The registry is generic. It knows parameter schemas and handler function
// pointers, never what an operation does. It is populated once at startup and
// only read afterwards.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{ToolConfig, WriteMode};
use crate::error::{Result, UftError};
use crate::paths;
use crate::types::{Arguments, Category, FileTarget, ParameterSpec};

/// Function bound to an operation id.
pub type Handler = fn(&Invocation<'_>) -> Result<Outcome>;

/// Static metadata for one operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationDescriptor {
    pub id: &'static str,
    pub category: Category,
    pub label: &'static str,
    pub parameters: &'static [ParameterSpec],
}

/// A descriptor bound to the handler that performs it.
#[derive(Clone, Copy)]
pub struct Operation {
    pub descriptor: OperationDescriptor,
    pub handler: Handler,
}

impl Operation {
    pub const fn new(
        category: Category,
        id: &'static str,
        label: &'static str,
        parameters: &'static [ParameterSpec],
        handler: Handler,
    ) -> Self {
        Self {
            descriptor: OperationDescriptor {
                id,
                category,
                label,
                parameters,
            },
            handler,
        }
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// All registered operations, indexed by category in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    by_category: HashMap<Category, Vec<Operation>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation. Ids must be unique within a category.
    pub fn register(&mut self, operation: Operation) -> Result<()> {
        let descriptor = operation.descriptor;
        let entries = self.by_category.entry(descriptor.category).or_default();
        if entries.iter().any(|op| op.descriptor.id == descriptor.id) {
            return Err(UftError::DuplicateOperationId {
                category: descriptor.category,
                id: descriptor.id,
            });
        }
        debug!(category = %descriptor.category, id = descriptor.id, "operation registered");
        entries.push(operation);
        Ok(())
    }

    /// Register a batch, stopping at the first duplicate.
    pub fn register_all(&mut self, operations: &[Operation]) -> Result<()> {
        operations.iter().try_for_each(|op| self.register(*op))
    }

    /// Operations for `category`, in menu order.
    pub fn operations(&self, category: Category) -> &[Operation] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Descriptors for `category`, in menu order.
    pub fn list_operations(&self, category: Category) -> Vec<&OperationDescriptor> {
        self.operations(category)
            .iter()
            .map(|op| &op.descriptor)
            .collect()
    }

    pub fn find(&self, category: Category, id: &str) -> Result<&Operation> {
        self.operations(category)
            .iter()
            .find(|op| op.descriptor.id == id)
            .ok_or_else(|| UftError::UnknownOperation {
                category,
                id: id.to_string(),
            })
    }

    /// Total number of registered operations.
    pub fn len(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -- Handler context ----------------------------------------------------------

/// Everything a handler receives for one call.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub target: &'a FileTarget,
    pub args: &'a Arguments,
    pub config: &'a ToolConfig,
}

impl<'a> Invocation<'a> {
    pub fn path(&self) -> &'a Path {
        &self.target.path
    }

    /// Destination of an operation that rewrites its input.
    ///
    /// The input itself by default; `<stem>_modified.<ext>` when the
    /// non-destructive write mode is active.
    pub fn in_place_output(&self) -> PathBuf {
        match self.config.write_mode {
            WriteMode::InPlace => self.target.path.clone(),
            WriteMode::Derived => paths::derived_same_ext(&self.target.path, "_modified"),
        }
    }

    /// File an appending operation should extend.
    ///
    /// In non-destructive mode the input is first copied to the derived path
    /// so the append leaves the original untouched.
    pub fn prepare_append(&self) -> Result<PathBuf> {
        let output = self.in_place_output();
        if output != self.target.path && self.target.path.exists() {
            std::fs::copy(&self.target.path, &output)
                .map_err(|e| UftError::io_at(&self.target.path, e))?;
        }
        Ok(output)
    }
}

/// What a successful handler produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Files created or mutated.
    pub outputs: Vec<PathBuf>,
    /// One-line status.
    pub summary: String,
    /// Additional report lines (counts, previews, warnings).
    pub details: Vec<String>,
}

impl Outcome {
    /// A single written file.
    pub fn written(path: impl Into<PathBuf>, summary: impl Into<String>) -> Self {
        Self {
            outputs: vec![path.into()],
            summary: summary.into(),
            details: Vec::new(),
        }
    }

    pub fn written_many(outputs: Vec<PathBuf>, summary: impl Into<String>) -> Self {
        Self {
            outputs,
            summary: summary.into(),
            details: Vec::new(),
        }
    }

    /// Report-only operations produce no files.
    pub fn report(summary: impl Into<String>) -> Self {
        Self {
            outputs: Vec::new(),
            summary: summary.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn detail(mut self, line: impl Into<String>) -> Self {
        self.details.push(line.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &Invocation<'_>) -> Result<Outcome> {
        Ok(Outcome::report("ok"))
    }

    const WIDTH: &[ParameterSpec] = &[ParameterSpec::int("width", "Width")];

    #[test]
    fn keeps_registration_order() {
        let mut registry = Registry::new();
        registry
            .register_all(&[
                Operation::new(Category::Text, "sortLines", "Sort lines", &[], noop),
                Operation::new(Category::Text, "countWords", "Count words", &[], noop),
                Operation::new(Category::Image, "resize", "Resize", WIDTH, noop),
            ])
            .unwrap();

        let ids: Vec<_> = registry
            .list_operations(Category::Text)
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, ["sortLines", "countWords"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.operations(Category::Video).is_empty());
    }

    #[test]
    fn rejects_duplicate_id_within_category() {
        let mut registry = Registry::new();
        registry
            .register(Operation::new(Category::Csv, "read", "Read", &[], noop))
            .unwrap();
        let err = registry
            .register(Operation::new(Category::Csv, "read", "Read again", &[], noop))
            .unwrap_err();
        assert!(matches!(err, UftError::DuplicateOperationId { id: "read", .. }));

        // Same id in another category is fine.
        registry
            .register(Operation::new(Category::Json, "read", "Read", &[], noop))
            .unwrap();
    }

    #[test]
    fn find_returns_same_descriptor_every_time() {
        let mut registry = Registry::new();
        registry
            .register(Operation::new(Category::Image, "resize", "Resize", WIDTH, noop))
            .unwrap();
        let first = registry.find(Category::Image, "resize").unwrap().descriptor;
        let second = registry.find(Category::Image, "resize").unwrap().descriptor;
        assert_eq!(first, second);
        assert_eq!(first.parameters.len(), 1);
    }

    #[test]
    fn unknown_id_is_reported() {
        let registry = Registry::new();
        let err = registry.find(Category::Pdf, "explode").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::UnknownOperation);
    }

    #[test]
    fn derived_mode_redirects_in_place_writes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, "hello\n").unwrap();
        let target = FileTarget::new(&input).unwrap();
        let args = Arguments::new();
        let config = ToolConfig {
            write_mode: WriteMode::Derived,
            ..ToolConfig::default()
        };
        let invocation = Invocation {
            target: &target,
            args: &args,
            config: &config,
        };

        let output = invocation.prepare_append().unwrap();
        assert_eq!(output, dir.path().join("notes_modified.txt"));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "hello\n");
    }
}
