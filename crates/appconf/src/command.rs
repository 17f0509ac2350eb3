// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `path`, `show`, `create` and `check` subcommands.
//!
//! Any clap-based application can embed [`ConfigCommand`] in its own
//! command tree and hand it to [`run`] with its path and spec.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use appconf_config::{abbreviate, report, ConfigError, ConfigSpec};
use clap::Subcommand;
use colored::Colorize;
use thiserror::Error;
use tracing::debug;

/// Manage the application's config file.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print where the config file lives.
    Path {
        /// Show the home directory as `~`.
        #[arg(long)]
        abbrev: bool,
    },
    /// Print the effective configuration, defaults included.
    Show,
    /// Write a config file holding every default.
    Create {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Report unknown, duplicate and invalid settings.
    Check,
}

impl ConfigCommand {
    /// Whether the command itself prints the file's issues and errors.
    pub fn reports_issues(&self) -> bool {
        matches!(self, ConfigCommand::Show | ConfigCommand::Check)
    }
}

/// How a successful command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// `check` found problems in the file.
    IssuesFound,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::IssuesFound => 2,
        }
    }
}

/// A command that could not complete.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("config file {} already exists; use --force to overwrite it", .0.display())]
    AlreadyExists(PathBuf),

    #[error("could not write output")]
    Output(#[from] io::Error),
}

impl CommandError {
    /// Render for the terminal. Config errors get a miette report.
    pub fn render(&self) -> String {
        match self {
            CommandError::Config(err) => report::render_error(err),
            other => format!("error: {other}"),
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Presentation settings for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputStyle {
    pub color: bool,
    /// Width of the rule under the `check` heading.
    pub width: usize,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            color: false,
            width: 50,
        }
    }
}

/// Run `command` against the config file at `path`.
pub fn run(
    command: &ConfigCommand,
    path: &Path,
    spec: &ConfigSpec,
    out: &mut impl Write,
    style: OutputStyle,
) -> Result<Outcome, CommandError> {
    debug!(?command, path = %path.display(), "running config command");
    match command {
        ConfigCommand::Path { abbrev } => {
            if *abbrev {
                writeln!(out, "{}", abbreviate(path))?;
            } else {
                writeln!(out, "{}", path.display())?;
            }
            Ok(Outcome::Success)
        }
        ConfigCommand::Show => {
            let outcome = appconf_config::load(path, spec)?;
            report::log_issues(path, &outcome.issues);
            write!(out, "{}", outcome.config)?;
            Ok(Outcome::Success)
        }
        ConfigCommand::Create { force } => {
            if path.exists() && !force {
                return Err(CommandError::AlreadyExists(path.to_path_buf()));
            }
            appconf_config::create(path, spec)?;
            writeln!(out, "created {}", abbreviate(path))?;
            Ok(Outcome::Success)
        }
        ConfigCommand::Check => check(path, spec, out, style),
    }
}

fn check(
    path: &Path,
    spec: &ConfigSpec,
    out: &mut impl Write,
    style: OutputStyle,
) -> Result<Outcome, CommandError> {
    let outcome = appconf_config::load(path, spec)?;
    let shown = abbreviate(path);

    if !outcome.from_file {
        writeln!(out, "{shown}: no config file, defaults in use")?;
        return Ok(Outcome::Success);
    }
    if outcome.is_clean() {
        let ok = if style.color {
            "ok".green().to_string()
        } else {
            "ok".to_string()
        };
        writeln!(out, "{shown}: {ok}")?;
        return Ok(Outcome::Success);
    }

    writeln!(out, "{shown}")?;
    writeln!(out, "{}", "-".repeat(style.width))?;
    for line in report::render_warnings(path, &outcome.issues) {
        if style.color {
            writeln!(out, "{}", line.yellow())?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    let count = outcome.issues.len();
    writeln!(
        out,
        "{count} {} found",
        if count == 1 { "issue" } else { "issues" }
    )?;
    Ok(Outcome::IssuesFound)
}
