// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable explanations for failed operations.
//
// Every error is mapped to plain English with a concrete next step. The
// severity tells the CLI whether re-running with different input can help.

use crate::error::UftError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user can fix it by changing the file, argument, or key.
    ActionRequired,
    /// The input cannot be processed by this operation.
    Permanent,
    /// An external program has to be installed first.
    InstallRequired,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try next.
    pub suggestion: String,
    pub severity: Severity,
}

impl HumanError {
    fn new(message: impl Into<String>, suggestion: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            severity,
        }
    }
}

/// One-line suggestion shown under a failed report.
pub fn hint(err: &UftError) -> String {
    humanize_error(err).suggestion
}

/// Convert a `UftError` into a `HumanError`.
pub fn humanize_error(err: &UftError) -> HumanError {
    use Severity::*;

    match err {
        // -- Resolution --
        UftError::UnsupportedFileType(detail) => HumanError::new(
            "This type of file isn't supported.",
            format!(
                "Supported extensions: jpg, jpeg, png, bmp, gif, pdf, txt, md, mp4, avi, mov, mkv, csv, json. (Got {detail})"
            ),
            Permanent,
        ),

        UftError::UnknownOperation { category, .. } => HumanError::new(
            "That operation doesn't exist for this file.",
            format!("Run with --list to see the operations available for {category} files."),
            ActionRequired,
        ),

        UftError::DuplicateOperationId { .. } => HumanError::new(
            "The operation catalogue is inconsistent.",
            "This is a bug in uft. Please report it.",
            Permanent,
        ),

        // -- Arguments --
        UftError::Validation { parameter, .. } => HumanError::new(
            "One of the values you entered isn't valid.",
            format!("Check the value given for '{parameter}' and try again."),
            ActionRequired,
        ),

        UftError::MissingArgument(name) => HumanError::new(
            "A required value is missing.",
            format!("Supply it with --arg {name}=VALUE."),
            ActionRequired,
        ),

        UftError::Prompt(_) => HumanError::new(
            "Input couldn't be read from the terminal.",
            "Run uft from an interactive terminal, or pass --op and --arg flags instead.",
            ActionRequired,
        ),

        // -- Files --
        UftError::NotFound(path) => HumanError::new(
            "The file couldn't be found.",
            format!("Check that {} exists and the path is spelled correctly.", path.display()),
            ActionRequired,
        ),

        UftError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError::new(
                    "Permission denied.",
                    "Check that you can read the input and write to its directory.",
                    ActionRequired,
                )
            } else {
                HumanError::new(
                    "There was a problem reading or writing a file.",
                    "Check the disk isn't full and the file isn't open elsewhere.",
                    ActionRequired,
                )
            }
        }

        // -- Handler failures --
        UftError::ImageError(_) => HumanError::new(
            "There's a problem with this image.",
            "The image may be damaged or in an unusual format. Try saving it as JPEG or PNG first.",
            Permanent,
        ),

        UftError::PdfError(detail) => {
            let lower = detail.to_ascii_lowercase();
            if lower.contains("page") && lower.contains("range") {
                HumanError::new(
                    "That page doesn't exist in this PDF.",
                    "Page numbers start at 1. Check how many pages the document has.",
                    ActionRequired,
                )
            } else {
                HumanError::new(
                    "There's a problem with this PDF file.",
                    "The file may be damaged. Try opening it in a PDF viewer to check it works.",
                    Permanent,
                )
            }
        }

        UftError::WrongPassword(_) => HumanError::new(
            "The password is incorrect.",
            "Check the password (it is case-sensitive) and try again.",
            ActionRequired,
        ),

        UftError::PasswordProtected(_) => HumanError::new(
            "This PDF is password-protected.",
            "Run the removePassword operation on it first, then retry on the _unlocked copy.",
            ActionRequired,
        ),

        UftError::Encryption(_) => HumanError::new(
            "The file couldn't be encrypted.",
            "Try again. If this keeps happening, please report it.",
            Permanent,
        ),

        UftError::DecryptionFailed(_) => HumanError::new(
            "The file couldn't be decrypted.",
            "Use the exact 64-character key printed when the file was encrypted.",
            ActionRequired,
        ),

        UftError::InvalidJson(_) => HumanError::new(
            "That isn't valid JSON.",
            "Check for missing quotes, commas, or brackets.",
            ActionRequired,
        ),

        UftError::UnsupportedStructure(_) => HumanError::new(
            "The JSON document has the wrong shape for this operation.",
            "Appending needs an array or object at the top level; CSV export needs an array of objects.",
            Permanent,
        ),

        UftError::Csv(_) => HumanError::new(
            "There's a problem with this CSV file.",
            "Check that every row has the same number of columns.",
            Permanent,
        ),

        UftError::ExternalTool { tool, .. } => HumanError::new(
            format!("{tool} reported an error."),
            "Check that the input is a valid media file and the arguments make sense for it.",
            Permanent,
        ),

        UftError::ToolUnavailable { tool, .. } => HumanError::new(
            format!("{tool} couldn't be started."),
            if tool.starts_with("ffmpeg") || tool.starts_with("ffprobe") {
                "Install ffmpeg (it provides both ffmpeg and ffprobe), or point --ffmpeg/--ffprobe at it.".to_string()
            } else if tool.starts_with("pdftoppm") {
                "Install poppler-utils, or point --pdftoppm at the program.".to_string()
            } else {
                format!("Make sure {tool} is installed and on your PATH.")
            },
            InstallRequired,
        ),

        UftError::Panicked(_) => HumanError::new(
            "The operation crashed unexpectedly.",
            "The input file may be malformed. Please report it if the file opens elsewhere.",
            Permanent,
        ),

        UftError::Other(_) => HumanError::new(
            "Something went wrong.",
            "Run again with --verbose for more detail.",
            Permanent,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_ffmpeg_needs_install() {
        let err = UftError::ToolUnavailable {
            tool: "ffmpeg".into(),
            reason: "No such file or directory".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::InstallRequired);
        assert!(human.suggestion.contains("ffmpeg"));
    }

    #[test]
    fn wrong_password_is_action_required() {
        let human = humanize_error(&UftError::WrongPassword(PathBuf::from("a.pdf")));
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn protected_pdf_points_to_remove_password() {
        let human = humanize_error(&UftError::PasswordProtected(PathBuf::from("locked.pdf")));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("removePassword"));
    }

    #[test]
    fn page_range_error_is_explained() {
        let err = UftError::PdfError("page 7 out of range (document has 3 pages)".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.message.contains("page"));
    }

    #[test]
    fn missing_argument_hint_names_flag() {
        let suggestion = hint(&UftError::MissingArgument("width".into()));
        assert!(suggestion.contains("--arg width=VALUE"));
    }
}
