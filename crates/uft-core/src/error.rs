// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for uft, plus the classification used by execution
// reports.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::types::Category;

/// Top-level error type for all uft operations.
#[derive(Debug, Error)]
pub enum UftError {
    // -- Resolution / registry --
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("unknown operation '{id}' for {category} files")]
    UnknownOperation { category: Category, id: String },

    #[error("operation id '{id}' registered twice for {category} files")]
    DuplicateOperationId { category: Category, id: &'static str },

    // -- Arguments --
    #[error("invalid value for '{parameter}': {reason}")]
    Validation {
        parameter: String,
        reason: ValidationReason,
    },

    #[error("argument '{0}' was not collected")]
    MissingArgument(String),

    #[error("input prompt failed: {0}")]
    Prompt(String),

    // -- Files --
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    // -- Handler failures --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("incorrect password for {}", .0.display())]
    WrongPassword(PathBuf),

    #[error("{} is password-protected", .0.display())]
    PasswordProtected(PathBuf),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unsupported JSON structure: {0}")]
    UnsupportedStructure(String),

    #[error("CSV operation failed: {0}")]
    Csv(String),

    #[error("{tool} exited with status {exit_code}: {message}")]
    ExternalTool {
        tool: String,
        exit_code: i32,
        message: String,
    },

    #[error("could not run {tool}: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    #[error("operation panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Other(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, UftError>;

impl UftError {
    /// Wrap an I/O error, promoting "not found" to [`UftError::NotFound`] so
    /// that the report names the missing path.
    pub fn io_at(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            UftError::NotFound(path.to_path_buf())
        } else {
            UftError::Io(err)
        }
    }

    /// Classify this error into the reporting taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UftError::UnsupportedFileType(_) => ErrorKind::UnsupportedFileType,
            UftError::UnknownOperation { .. } => ErrorKind::UnknownOperation,
            UftError::Validation { .. }
            | UftError::MissingArgument(_)
            | UftError::Prompt(_) => ErrorKind::InvalidArgument,
            UftError::NotFound(_) => ErrorKind::NotFound,
            UftError::DuplicateOperationId { .. } => ErrorKind::HandlerFailure(FailureCause::Other),
            UftError::Io(_) => ErrorKind::HandlerFailure(FailureCause::Io),
            UftError::ImageError(_) => ErrorKind::HandlerFailure(FailureCause::Image),
            UftError::PdfError(_) => ErrorKind::HandlerFailure(FailureCause::Pdf),
            UftError::WrongPassword(_) => ErrorKind::HandlerFailure(FailureCause::WrongPassword),
            UftError::PasswordProtected(_) => {
                ErrorKind::HandlerFailure(FailureCause::PasswordProtected)
            }
            UftError::Encryption(_) => ErrorKind::HandlerFailure(FailureCause::Encryption),
            UftError::DecryptionFailed(_) => {
                ErrorKind::HandlerFailure(FailureCause::DecryptionFailed)
            }
            UftError::InvalidJson(_) => ErrorKind::HandlerFailure(FailureCause::InvalidJson),
            UftError::UnsupportedStructure(_) => {
                ErrorKind::HandlerFailure(FailureCause::UnsupportedStructure)
            }
            UftError::Csv(_) => ErrorKind::HandlerFailure(FailureCause::Csv),
            UftError::ExternalTool { .. } | UftError::ToolUnavailable { .. } => {
                ErrorKind::HandlerFailure(FailureCause::ExternalTool)
            }
            UftError::Panicked(_) => ErrorKind::HandlerFailure(FailureCause::Panic),
            UftError::Other(_) => ErrorKind::HandlerFailure(FailureCause::Other),
        }
    }
}

/// Why a raw argument value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationReason {
    /// Required value absent (or blank) and no default declared.
    Missing,
    /// Text could not be parsed as an integer.
    NotAnInteger,
    /// Text could not be parsed as a number.
    NotANumber,
    /// Numeric value outside the declared inclusive range.
    OutOfRange,
    /// Value is not one of the declared enum options.
    NotAnOption,
    /// Text or list is empty where content is required.
    Empty,
    /// A `NAME=VALUE` flag without the `=`.
    Malformed,
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ValidationReason::Missing => "a value is required",
            ValidationReason::NotAnInteger => "not a whole number",
            ValidationReason::NotANumber => "not a number",
            ValidationReason::OutOfRange => "outside the allowed range",
            ValidationReason::NotAnOption => "not one of the allowed options",
            ValidationReason::Empty => "must not be empty",
            ValidationReason::Malformed => "expected NAME=VALUE",
        };
        f.write_str(text)
    }
}

/// Outcome classification carried by every failed execution report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnsupportedFileType,
    UnknownOperation,
    InvalidArgument,
    HandlerFailure(FailureCause),
    NotFound,
}

/// Refinement of [`ErrorKind::HandlerFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureCause {
    Io,
    Image,
    Pdf,
    WrongPassword,
    PasswordProtected,
    DecryptionFailed,
    Encryption,
    InvalidJson,
    UnsupportedStructure,
    Csv,
    ExternalTool,
    Panic,
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::HandlerFailure(cause) => write!(f, "HandlerFailure({:?})", cause),
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_classified_not_found() {
        let err = UftError::io_at(
            Path::new("/nope/file.txt"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("/nope/file.txt"));
    }

    #[test]
    fn permission_error_stays_io() {
        let err = UftError::io_at(
            Path::new("locked.txt"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), ErrorKind::HandlerFailure(FailureCause::Io));
    }

    #[test]
    fn bad_json_is_invalid_json_failure() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = UftError::from(parse_err);
        assert_eq!(
            err.kind(),
            ErrorKind::HandlerFailure(FailureCause::InvalidJson)
        );
    }

    #[test]
    fn validation_reports_parameter_name() {
        let err = UftError::Validation {
            parameter: "angle".into(),
            reason: ValidationReason::NotAnOption,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            err.to_string(),
            "invalid value for 'angle': not one of the allowed options"
        );
    }
}
