// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Argument collection: raw text from a source, coerced and validated against
// a parameter schema.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, UftError, ValidationReason};
use crate::types::{Arguments, Constraint, ParameterKind, ParameterSpec, Value};

/// Where raw argument text comes from.
///
/// Implemented by the interactive prompt in the binary, by [`FlagSource`]
/// for `--arg NAME=VALUE` flags and by [`MapSource`] for programmatic use.
pub trait ArgumentSource {
    /// Raw text for `spec`, or `None` if the source has nothing for it.
    fn raw_value(&mut self, spec: &ParameterSpec) -> Result<Option<String>>;
}

/// Pre-supplied name/value pairs.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ArgumentSource for MapSource {
    fn raw_value(&mut self, spec: &ParameterSpec) -> Result<Option<String>> {
        Ok(self.values.get(spec.name).cloned())
    }
}

/// Values from repeated `NAME=VALUE` command-line flags.
#[derive(Debug, Clone, Default)]
pub struct FlagSource {
    inner: MapSource,
}

impl FlagSource {
    /// Parse flags. The value may itself contain `=`; only the first splits.
    pub fn from_flags<S: AsRef<str>>(flags: &[S]) -> Result<Self> {
        let mut values = HashMap::new();
        for flag in flags {
            let flag = flag.as_ref();
            let (name, value) = flag.split_once('=').ok_or_else(|| UftError::Validation {
                parameter: flag.to_string(),
                reason: ValidationReason::Malformed,
            })?;
            values.insert(name.trim().to_string(), value.to_string());
        }
        Ok(Self {
            inner: MapSource { values },
        })
    }
}

impl ArgumentSource for FlagSource {
    fn raw_value(&mut self, spec: &ParameterSpec) -> Result<Option<String>> {
        self.inner.raw_value(spec)
    }
}

/// Coerce raw text to `spec`'s kind and check its constraint.
pub fn coerce(spec: &ParameterSpec, raw: &str) -> std::result::Result<Value, ValidationReason> {
    let trimmed = raw.trim();
    let value = match spec.kind {
        ParameterKind::Int => Value::Int(parse_int(trimmed)?),
        ParameterKind::Float => {
            let v: f64 = trimmed.parse().map_err(|_| ValidationReason::NotANumber)?;
            if !v.is_finite() {
                return Err(ValidationReason::NotANumber);
            }
            Value::Float(v)
        }
        ParameterKind::String => Value::Text(raw.to_string()),
        ParameterKind::Path => {
            if trimmed.is_empty() {
                return Err(ValidationReason::Empty);
            }
            Value::Path(PathBuf::from(trimmed))
        }
        ParameterKind::Enum(options) => {
            let canonical = options
                .iter()
                .find(|opt| opt.eq_ignore_ascii_case(trimmed))
                .ok_or(ValidationReason::NotAnOption)?;
            Value::Choice(canonical)
        }
        ParameterKind::IntList => {
            let items = list_items(trimmed)?;
            Value::IntList(items.into_iter().map(parse_int).collect::<std::result::Result<_, _>>()?)
        }
        ParameterKind::PathList => {
            Value::PathList(list_items(trimmed)?.into_iter().map(PathBuf::from).collect())
        }
    };
    check_constraint(spec.constraint, &value)?;
    Ok(value)
}

fn parse_int(text: &str) -> std::result::Result<i64, ValidationReason> {
    text.parse().map_err(|_| ValidationReason::NotAnInteger)
}

fn list_items(text: &str) -> std::result::Result<Vec<&str>, ValidationReason> {
    let items: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        Err(ValidationReason::Empty)
    } else {
        Ok(items)
    }
}

fn check_constraint(
    constraint: Option<Constraint>,
    value: &Value,
) -> std::result::Result<(), ValidationReason> {
    let in_range = |v: f64, min: f64, max: f64| (min..=max).contains(&v);
    match (constraint, value) {
        (Some(Constraint::Range { min, max }), Value::Int(v)) if !in_range(*v as f64, min, max) => {
            Err(ValidationReason::OutOfRange)
        }
        (Some(Constraint::Range { min, max }), Value::Float(v)) if !in_range(*v, min, max) => {
            Err(ValidationReason::OutOfRange)
        }
        (Some(Constraint::Range { min, max }), Value::IntList(items))
            if items.iter().any(|v| !in_range(*v as f64, min, max)) =>
        {
            Err(ValidationReason::OutOfRange)
        }
        (Some(Constraint::NonEmpty), Value::Text(text)) if text.trim().is_empty() => {
            Err(ValidationReason::Empty)
        }
        _ => Ok(()),
    }
}

/// Gathers a complete, validated [`Arguments`] set for a schema.
pub struct ArgumentCollector;

impl ArgumentCollector {
    /// Collect every parameter in order.
    ///
    /// Stops at the first invalid value; the caller never sees a partially
    /// collected set.
    pub fn collect(specs: &[ParameterSpec], source: &mut dyn ArgumentSource) -> Result<Arguments> {
        let mut args = Arguments::new();
        for spec in specs {
            let raw = source.raw_value(spec)?;
            // Blank text is a legitimate String value (e.g. an empty replacement).
            let raw = match raw {
                Some(text) if spec.kind == ParameterKind::String || !text.trim().is_empty() => {
                    Some(text)
                }
                _ => spec.default.map(str::to_string),
            };
            let Some(raw) = raw else {
                if spec.required {
                    return Err(UftError::Validation {
                        parameter: spec.name.to_string(),
                        reason: ValidationReason::Missing,
                    });
                }
                continue;
            };
            let value = coerce(spec, &raw).map_err(|reason| UftError::Validation {
                parameter: spec.name.to_string(),
                reason,
            })?;
            debug!(parameter = spec.name, ?value, "argument accepted");
            args.insert(spec.name, value);
        }
        Ok(args)
    }
}
