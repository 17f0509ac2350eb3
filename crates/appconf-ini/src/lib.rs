// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Comment-preserving INI documents in the configobj dialect.
//!
//! The parser keeps every comment, blank line and the verbatim text of each
//! entry so that a document which is parsed and rendered again without
//! changes comes back byte-for-byte. Edited entries are re-rendered in a
//! normalized `key = value` form.
//!
//! # Usage
//!
//! ```
//! use appconf_ini::{Document, RawValue};
//!
//! let mut doc = Document::parse("# editor settings\n[core]\neditor = vim\n").unwrap();
//! let core = doc.root_mut().child_mut("core").unwrap();
//! core.set("pager", RawValue::unquoted("less"));
//! assert_eq!(doc.to_string(), "# editor settings\n[core]\neditor = vim\npager = less\n");
//! ```

pub mod document;
pub mod error;
mod parser;
pub mod value;

pub use document::{Document, DuplicateKey, Entry, Section};
pub use error::{ParseError, ParseErrorKind};
pub use value::RawValue;
