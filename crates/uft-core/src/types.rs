// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: file categories, parameter schemas, and collected values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, UftError};

/// Family of files that share one operation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Image,
    Pdf,
    Text,
    Markdown,
    Video,
    Csv,
    Json,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Category; 7] = [
        Category::Image,
        Category::Pdf,
        Category::Text,
        Category::Markdown,
        Category::Video,
        Category::Csv,
        Category::Json,
    ];

    /// Infer the category from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "bmp" | "gif" => Some(Self::Image),
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            "md" => Some(Self::Markdown),
            "mp4" | "avi" | "mov" | "mkv" => Some(Self::Video),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "PDF",
            Self::Text => "text",
            Self::Markdown => "markdown",
            Self::Video => "video",
            Self::Csv => "CSV",
            Self::Json => "JSON",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A file the user asked to operate on, with its resolved category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    pub path: PathBuf,
    pub category: Category,
}

impl FileTarget {
    /// Resolve the category of `path` by extension.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let category = crate::resolver::CategoryResolver::resolve(&path)?;
        Ok(Self { path, category })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// -- Parameter schema ---------------------------------------------------------

/// Declared type of one operation input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterKind {
    Int,
    Float,
    String,
    Path,
    /// One of a fixed set of options, matched case-insensitively.
    Enum(&'static [&'static str]),
    /// Comma-separated integers, e.g. page numbers.
    IntList,
    /// Comma-separated paths.
    PathList,
}

impl ParameterKind {
    /// Short description used in prompts and `--list` output.
    pub fn describe(&self) -> String {
        match self {
            ParameterKind::Int => "integer".to_string(),
            ParameterKind::Float => "number".to_string(),
            ParameterKind::String => "text".to_string(),
            ParameterKind::Path => "path".to_string(),
            ParameterKind::Enum(options) => options.join("|"),
            ParameterKind::IntList => "integers, comma-separated".to_string(),
            ParameterKind::PathList => "paths, comma-separated".to_string(),
        }
    }
}

/// Additional restriction on a coerced value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Inclusive numeric bounds (applies to each element of an `IntList`).
    Range { min: f64, max: f64 },
    /// Text must contain at least one non-whitespace character.
    NonEmpty,
}

/// Describes one input an operation needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub prompt: &'static str,
    pub kind: ParameterKind,
    pub required: bool,
    pub constraint: Option<Constraint>,
    /// Raw value used when the source supplies nothing.
    pub default: Option<&'static str>,
}

impl ParameterSpec {
    pub const fn new(name: &'static str, kind: ParameterKind, prompt: &'static str) -> Self {
        Self {
            name,
            prompt,
            kind,
            required: true,
            constraint: None,
            default: None,
        }
    }

    pub const fn int(name: &'static str, prompt: &'static str) -> Self {
        Self::new(name, ParameterKind::Int, prompt)
    }

    pub const fn float(name: &'static str, prompt: &'static str) -> Self {
        Self::new(name, ParameterKind::Float, prompt)
    }

    pub const fn text(name: &'static str, prompt: &'static str) -> Self {
        Self::new(name, ParameterKind::String, prompt)
    }

    pub const fn path(name: &'static str, prompt: &'static str) -> Self {
        Self::new(name, ParameterKind::Path, prompt)
    }

    pub const fn choice(
        name: &'static str,
        options: &'static [&'static str],
        prompt: &'static str,
    ) -> Self {
        Self::new(name, ParameterKind::Enum(options), prompt)
    }

    pub const fn int_list(name: &'static str, prompt: &'static str) -> Self {
        Self::new(name, ParameterKind::IntList, prompt)
    }

    pub const fn path_list(name: &'static str, prompt: &'static str) -> Self {
        Self::new(name, ParameterKind::PathList, prompt)
    }

    /// Restrict numeric values to `min..=max`.
    pub const fn range(mut self, min: f64, max: f64) -> Self {
        self.constraint = Some(Constraint::Range { min, max });
        self
    }

    pub const fn non_empty(mut self) -> Self {
        self.constraint = Some(Constraint::NonEmpty);
        self
    }

    /// Make the parameter optional, falling back to `default`.
    pub const fn or_default(mut self, default: &'static str) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }
}

// -- Collected values ---------------------------------------------------------

/// A coerced, validated argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Path(PathBuf),
    /// Canonical spelling of the selected enum option.
    Choice(&'static str),
    IntList(Vec<i64>),
    PathList(Vec<PathBuf>),
}

/// The complete, validated argument set handed to a handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<(&'static str, Value)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, value: Value) {
        self.values.retain(|(existing, _)| *existing != name);
        self.values.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        match self.get(name) {
            Some(Value::Int(v)) => Ok(*v),
            _ => Err(UftError::MissingArgument(name.to_string())),
        }
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        match self.get(name) {
            Some(Value::Float(v)) => Ok(*v),
            Some(Value::Int(v)) => Ok(*v as f64),
            _ => Err(UftError::MissingArgument(name.to_string())),
        }
    }

    pub fn text(&self, name: &str) -> Result<&str> {
        match self.get(name) {
            Some(Value::Text(v)) => Ok(v.as_str()),
            _ => Err(UftError::MissingArgument(name.to_string())),
        }
    }

    pub fn path(&self, name: &str) -> Result<&Path> {
        match self.get(name) {
            Some(Value::Path(v)) => Ok(v.as_path()),
            _ => Err(UftError::MissingArgument(name.to_string())),
        }
    }

    pub fn choice(&self, name: &str) -> Result<&'static str> {
        match self.get(name) {
            Some(Value::Choice(v)) => Ok(v),
            _ => Err(UftError::MissingArgument(name.to_string())),
        }
    }

    pub fn int_list(&self, name: &str) -> Result<&[i64]> {
        match self.get(name) {
            Some(Value::IntList(v)) => Ok(v.as_slice()),
            _ => Err(UftError::MissingArgument(name.to_string())),
        }
    }

    pub fn path_list(&self, name: &str) -> Result<&[PathBuf]> {
        match self.get(name) {
            Some(Value::PathList(v)) => Ok(v.as_slice()),
            _ => Err(UftError::MissingArgument(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(Category::from_extension("PNG"), Some(Category::Image));
        assert_eq!(Category::from_extension("Json"), Some(Category::Json));
        assert_eq!(Category::from_extension("exe"), None);
    }

    #[test]
    fn typed_accessors_reject_wrong_kind() {
        let mut args = Arguments::new();
        args.insert("width", Value::Int(640));
        assert_eq!(args.int("width").unwrap(), 640);
        assert_eq!(args.float("width").unwrap(), 640.0);
        assert!(args.text("width").is_err());
        assert!(matches!(
            args.int("height"),
            Err(UftError::MissingArgument(name)) if name == "height"
        ));
    }

    #[test]
    fn insert_replaces_existing_value() {
        let mut args = Arguments::new();
        args.insert("q", Value::Int(1));
        args.insert("q", Value::Int(2));
        assert_eq!(args.len(), 1);
        assert_eq!(args.int("q").unwrap(), 2);
    }

    #[test]
    fn builder_marks_optional_parameters() {
        const SPEC: ParameterSpec = ParameterSpec::text("color", "Text colour").or_default("white");
        assert!(!SPEC.required);
        assert_eq!(SPEC.default, Some("white"));
    }
}
