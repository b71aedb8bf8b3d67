// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface of the `uft` binary.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};
use tracing::{debug, info};
use uft_core::human_errors;
use uft_core::{Dispatcher, ExecutionReport, FileTarget, FlagSource, ToolConfig, UftError, WriteMode};

use crate::catalog;
use crate::prompt::PromptSource;
use crate::render;

/// Exit status for an unusable target file.
const EXIT_BAD_TARGET: u8 = 2;

/// Parsed command line.
#[derive(Parser, Debug)]
#[command(
    name = "uft",
    version,
    about = "Run one operation on an image, PDF, text, markdown, video, CSV or JSON file"
)]
pub struct Cli {
    /// File to operate on. Its extension selects the operation menu.
    pub file: PathBuf,

    /// Run this operation id and exit instead of showing the menu.
    #[arg(long, value_name = "ID")]
    pub op: Option<String>,

    /// Argument for --op. Repeat once per parameter.
    #[arg(long = "arg", value_name = "NAME=VALUE", requires = "op")]
    pub args: Vec<String>,

    /// List the operations available for FILE and exit.
    #[arg(long, conflicts_with = "op")]
    pub list: bool,

    /// Print reports as JSON.
    #[arg(long)]
    pub json: bool,

    /// Write `<stem>_modified.<ext>` instead of overwriting FILE.
    #[arg(long)]
    pub non_destructive: bool,

    /// Debug logging on stderr (RUST_LOG takes precedence).
    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, value_name = "PATH", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    #[arg(long, value_name = "PATH", default_value = "ffprobe")]
    pub ffprobe: PathBuf,

    #[arg(long, value_name = "PATH", default_value = "pdftoppm")]
    pub pdftoppm: PathBuf,
}

impl Cli {
    pub fn tool_config(&self) -> ToolConfig {
        ToolConfig {
            write_mode: if self.non_destructive {
                WriteMode::Derived
            } else {
                WriteMode::InPlace
            },
            ffmpeg: self.ffmpeg.clone(),
            ffprobe: self.ffprobe.clone(),
            pdftoppm: self.pdftoppm.clone(),
            ..ToolConfig::default()
        }
    }
}

/// Resolve the target, then run single-shot or interactive.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let registry = catalog::build_registry().context("building the operation catalog")?;
    let target = match FileTarget::new(&cli.file) {
        Ok(target) => target,
        Err(err) => return Ok(reject_target(&err)),
    };
    debug!(category = %target.category, "target resolved");

    if cli.list {
        print!("{}", render::format_operations(&registry, target.category));
        return Ok(ExitCode::SUCCESS);
    }

    let dispatcher = Dispatcher::new(&registry, cli.tool_config());
    match &cli.op {
        Some(op) => single_shot(&dispatcher, &target, op, cli),
        None => {
            if !target.path.exists() {
                return Ok(reject_target(&UftError::NotFound(target.path.clone())));
            }
            interactive(&dispatcher, &target, cli.json)
        }
    }
}

fn reject_target(err: &UftError) -> ExitCode {
    eprintln!("error: {err}");
    eprintln!("hint: {}", human_errors::hint(err));
    ExitCode::from(EXIT_BAD_TARGET)
}

fn single_shot(
    dispatcher: &Dispatcher<'_>,
    target: &FileTarget,
    op: &str,
    cli: &Cli,
) -> Result<ExitCode> {
    let report = match FlagSource::from_flags(&cli.args) {
        Ok(mut source) => dispatcher.execute(target.category, op, target, &mut source),
        Err(err) => ExecutionReport::failed(op, target.category, &err),
    };
    render::print_report(&report, cli.json)?;
    Ok(ExitCode::from(report.exit_code()))
}

/// Menu loop. Failed operations are reported and the loop continues.
fn interactive(dispatcher: &Dispatcher<'_>, target: &FileTarget, json: bool) -> Result<ExitCode> {
    let theme = ColorfulTheme::default();
    let operations = dispatcher.registry().list_operations(target.category);
    let items: Vec<String> = operations
        .iter()
        .map(|op| format!("{} - {}", op.id, op.label))
        .collect();
    let mut status = 0;

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt(format!("{} operation", target.category))
            .items(&items)
            .default(0)
            .interact_opt()
            .context("reading the operation menu")?;
        let Some(index) = selection else {
            break;
        };
        let id = operations[index].id;
        info!(operation = id, "selected");

        let mut source = PromptSource::new(&theme);
        let report = dispatcher.execute(target.category, id, target, &mut source);
        render::print_report(&report, json)?;
        status = report.exit_code();

        let again = Confirm::with_theme(&theme)
            .with_prompt("Run another operation on this file?")
            .default(false)
            .interact()
            .context("reading confirmation")?;
        if !again {
            break;
        }
    }
    Ok(ExitCode::from(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn single_shot_flags_parse() {
        let cli = Cli::try_parse_from([
            "uft",
            "photo.png",
            "--op",
            "resize",
            "--arg",
            "width=64",
            "--arg",
            "height=32",
            "--non-destructive",
        ])
        .unwrap();
        assert_eq!(cli.op.as_deref(), Some("resize"));
        assert_eq!(cli.args, vec!["width=64", "height=32"]);
        assert_eq!(cli.tool_config().write_mode, WriteMode::Derived);
    }

    #[test]
    fn arg_requires_op() {
        assert!(Cli::try_parse_from(["uft", "a.txt", "--arg", "text=x"]).is_err());
    }

    #[test]
    fn tool_paths_default_to_program_names() {
        let cli = Cli::try_parse_from(["uft", "clip.mp4", "--ffmpeg", "/opt/ffmpeg"]).unwrap();
        let config = cli.tool_config();
        assert_eq!(config.ffmpeg, PathBuf::from("/opt/ffmpeg"));
        assert_eq!(config.ffprobe, PathBuf::from("ffprobe"));
        assert_eq!(config.write_mode, WriteMode::InPlace);
    }

    #[test]
    fn unsupported_extension_exits_2() {
        let cli = Cli::try_parse_from(["uft", "setup.exe", "--list"]).unwrap();
        assert_eq!(run(&cli).unwrap(), ExitCode::from(2));
    }

    #[test]
    fn single_shot_reports_failure_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "b\na\n").unwrap();
        let file = path.to_string_lossy().into_owned();

        let cli = Cli::try_parse_from(["uft", file.as_str(), "--op", "sortLines"]).unwrap();
        assert_eq!(run(&cli).unwrap(), ExitCode::SUCCESS);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");

        let cli = Cli::try_parse_from(["uft", file.as_str(), "--op", "split"]).unwrap();
        assert_eq!(run(&cli).unwrap(), ExitCode::from(1));
    }
}
