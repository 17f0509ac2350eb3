// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config-file subcommands for command-line applications, plus the pieces
//! the `appconf` binary uses to manage its own settings.

pub mod command;
pub mod logging;
pub mod settings;

pub use command::{run, CommandError, ConfigCommand, Outcome, OutputStyle};
