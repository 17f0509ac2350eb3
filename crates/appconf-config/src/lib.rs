// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Locate, load, validate and persist one INI config file per application.
//!
//! An application declares its settings in a [`ConfigSpec`], finds its file
//! with [`ConfigLocation`], and calls [`load`]. Loading always yields a
//! complete [`ConfigObject`]; anything wrong with the file's contents comes
//! back as [`ValidationIssue`]s for the caller to show. Writing the object
//! back keeps the user's comments and layout.
//!
//! ```no_run
//! use appconf_config::{load, report, ConfigLocation, ConfigSpec, FieldSpec};
//!
//! let mut spec = ConfigSpec::new();
//! spec.section("core").field(FieldSpec::string("editor", "vim"));
//!
//! let path = ConfigLocation::new("dob").resolve();
//! let outcome = load(&path, &spec)?;
//! report::log_issues(&path, &outcome.issues);
//! let editor = outcome.config.get("core", "editor");
//! # Ok::<(), appconf_config::ConfigError>(())
//! ```

pub mod error;
pub mod issue;
pub mod object;
pub mod paths;
pub mod report;
pub mod spec;
pub mod store;
pub mod value;
pub mod writer;

pub use error::ConfigError;
pub use issue::{IssueKind, ValidationIssue};
pub use object::{ConfigObject, Section};
pub use paths::{abbreviate, ConfigLocation};
pub use spec::{ConfigSpec, FieldSpec, SectionSpec, Validator};
pub use store::{create, load, load_str, LoadOutcome};
pub use value::{Value, ValueType};
pub use writer::{to_ini_string, write};
