// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive argument source backed by dialoguer prompts.

use dialoguer::Input;
use dialoguer::theme::Theme;
use uft_core::collect::coerce;
use uft_core::{ArgumentSource, Constraint, ParameterKind, ParameterSpec, Result, UftError};

/// Asks for each parameter on the terminal. Values are re-prompted until
/// they coerce, so the collector only sees acceptable text or nothing.
pub struct PromptSource<'t> {
    theme: &'t dyn Theme,
}

impl<'t> PromptSource<'t> {
    pub fn new(theme: &'t dyn Theme) -> Self {
        Self { theme }
    }
}

impl ArgumentSource for PromptSource<'_> {
    fn raw_value(&mut self, spec: &ParameterSpec) -> Result<Option<String>> {
        let spec = *spec;
        let mut input = Input::<String>::with_theme(self.theme)
            .with_prompt(prompt_text(&spec))
            .allow_empty(true);
        if let Some(default) = spec.default {
            input = input.default(default.to_string());
        }
        let text = input
            .validate_with(move |text: &String| check(&spec, text))
            .interact_text()
            .map_err(|e| UftError::Prompt(e.to_string()))?;

        if text.trim().is_empty() && spec.kind != ParameterKind::String {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }
}

fn check(spec: &ParameterSpec, text: &str) -> std::result::Result<(), String> {
    if text.trim().is_empty() && spec.kind != ParameterKind::String {
        return if spec.required && spec.default.is_none() {
            Err("a value is required".to_string())
        } else {
            Ok(())
        };
    }
    coerce(spec, text).map(|_| ()).map_err(|reason| reason.to_string())
}

/// `Prompt (kind, range)`.
pub fn prompt_text(spec: &ParameterSpec) -> String {
    let mut hint = spec.kind.describe();
    match spec.constraint {
        Some(Constraint::Range { min, max }) => hint.push_str(&format!(", {min} to {max}")),
        Some(Constraint::NonEmpty) => hint.push_str(", required"),
        None => {}
    }
    format!("{} ({hint})", spec.prompt)
}
