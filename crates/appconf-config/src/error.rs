// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fatal errors. Data problems inside a readable file are never errors;
//! they are returned as [`ValidationIssue`](crate::issue::ValidationIssue)s.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::path::PathBuf;

use appconf_ini::ParseError;
use miette::Diagnostic;
use thiserror::Error;

/// A failure that leaves the caller without a usable configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The file exists but is not valid INI.
    #[error("config file {} is not valid INI", .path.display())]
    #[diagnostic(
        code(appconf::config::parse),
        help("fix the line shown above, or move the file aside to regenerate defaults")
    )]
    Parse {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: ParseError,
    },

    /// The configuration holds a value that cannot be written as INI.
    /// Nothing was written.
    #[error("config for {} cannot be written as valid INI", .path.display())]
    #[diagnostic(
        code(appconf::config::unrepresentable),
        help("a string value mixes `\"\"\"` and `'''` in a way no quoting can hold")
    )]
    Unrepresentable {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: ParseError,
    },

    /// The file exists but could not be read.
    #[error("could not read config file {}", .path.display())]
    #[diagnostic(code(appconf::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file or its parent directory could not be written.
    #[error("could not write config file {}", .path.display())]
    #[diagnostic(
        code(appconf::config::write),
        help("check that the directory is writable")
    )]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            ConfigError::Parse { path, .. }
            | ConfigError::Unrepresentable { path, .. }
            | ConfigError::Read { path, .. }
            | ConfigError::Write { path, .. } => path,
        }
    }
}
