// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading and creating config files.
//!
//! Loading never fails on data problems. Unknown names, duplicates and
//! ill-typed values become [`ValidationIssue`]s and the affected settings
//! fall back to their defaults. Only an unreadable file or broken INI
//! syntax is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use appconf_ini::Document;
use tracing::debug;

use crate::error::ConfigError;
use crate::issue::{suggest_name, ValidationIssue};
use crate::object::{ConfigObject, Section};
use crate::spec::{ConfigSpec, SectionSpec};
use crate::writer;

/// The result of [`load`]: a complete configuration and what was wrong
/// with the file.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub config: ConfigObject,
    /// Sorted by source line, then by kind.
    pub issues: Vec<ValidationIssue>,
    /// `false` when the file did not exist and only defaults were used.
    pub from_file: bool,
}

impl LoadOutcome {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Load the config file at `path`, filling gaps from `spec`.
///
/// A missing file is not an error: the result holds every default and no
/// issues.
pub fn load(path: &Path, spec: &ConfigSpec) -> Result<LoadOutcome, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(LoadOutcome {
                config: defaults(spec),
                issues: Vec::new(),
                from_file: false,
            });
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let outcome = load_named(path.to_path_buf(), &contents, spec)?;
    debug!(
        path = %path.display(),
        issues = outcome.issues.len(),
        "loaded config file"
    );
    Ok(outcome)
}

/// Like [`load`], for text already in memory. `name` labels parse errors.
pub fn load_str(name: &str, contents: &str, spec: &ConfigSpec) -> Result<LoadOutcome, ConfigError> {
    load_named(PathBuf::from(name), contents, spec)
}

fn load_named(path: PathBuf, contents: &str, spec: &ConfigSpec) -> Result<LoadOutcome, ConfigError> {
    let doc = Document::parse_named(&path.display().to_string(), contents)
        .map_err(|source| ConfigError::Parse { path, source })?;
    let (config, issues) = resolve(doc, spec);
    Ok(LoadOutcome {
        config,
        issues,
        from_file: true,
    })
}

/// Resolve a parsed document against `spec`. The document becomes the
/// object's source so later writes keep its layout.
pub fn resolve(doc: Document, spec: &ConfigSpec) -> (ConfigObject, Vec<ValidationIssue>) {
    let mut issues = Vec::new();
    let mut path = Vec::new();
    let root = resolve_section(doc.root(), spec.root(), &mut path, &mut issues);

    // Reported in unknown sections too: the earlier values are gone from
    // the object, so the next write drops them from disk.
    for dup in doc.duplicates() {
        issues.push(ValidationIssue::DuplicateKey {
            section: dup.section.clone(),
            key: dup.key.clone(),
            raw_value: dup.value.to_string(),
            first_line: dup.first_line,
            line: dup.line,
        });
    }

    issues.sort_by_key(|issue| (issue.line(), issue.kind()));
    (ConfigObject::from_parts(root, Some(doc)), issues)
}

fn resolve_section(
    raw: &appconf_ini::Section,
    spec: &SectionSpec,
    path: &mut Vec<String>,
    issues: &mut Vec<ValidationIssue>,
) -> Section {
    let mut section = Section::new();

    for entry in raw.entries() {
        let Some(field) = spec.get_field(entry.key()) else {
            issues.push(ValidationIssue::UnknownKey {
                section: path.clone(),
                key: entry.key().to_string(),
                raw_value: entry.value().to_string(),
                line: entry.line(),
                suggestion: suggest_name(entry.key(), &spec.field_keys()),
            });
            section.push_unexpected(entry.key(), entry.value().clone());
            continue;
        };

        match field.check(entry.value()) {
            Ok(value) => section.set(entry.key(), value),
            Err(expected) => issues.push(ValidationIssue::TypeMismatch {
                section: path.clone(),
                key: entry.key().to_string(),
                raw_value: entry.value().to_string(),
                expected,
                line: entry.line(),
            }),
        }
    }

    for field in spec.fields() {
        if section.get(field.key()).is_none() {
            section.set(field.key(), field.default_value().clone());
        }
    }

    for child in raw.children() {
        match spec.get_section(child.name()) {
            Some(child_spec) => {
                path.push(child.name().to_string());
                let resolved = resolve_section(child, child_spec, path, issues);
                path.pop();
                section.push_section(child.name(), resolved);
            }
            None => {
                let mut section_path = path.clone();
                section_path.push(child.name().to_string());
                issues.push(ValidationIssue::UnknownSection {
                    section: section_path,
                    line: child.line(),
                    suggestion: suggest_name(child.name(), &spec.section_names()),
                });
                section.push_unexpected_section(child.clone());
            }
        }
    }

    for child_spec in spec.sections() {
        if section.section(child_spec.name()).is_none() {
            section.push_section(child_spec.name(), default_section(child_spec));
        }
    }

    section
}

/// An object holding every declared default and nothing else.
pub fn defaults(spec: &ConfigSpec) -> ConfigObject {
    ConfigObject::from_parts(default_section(spec.root()), None)
}

fn default_section(spec: &SectionSpec) -> Section {
    let mut section = Section::new();
    for field in spec.fields() {
        section.set(field.key(), field.default_value().clone());
    }
    for child in spec.sections() {
        section.push_section(child.name(), default_section(child));
    }
    section
}

/// Write a fresh file at `path` holding every declared default, each under
/// its doc comment. Parent directories are created. An existing file is
/// overwritten.
pub fn create(path: &Path, spec: &ConfigSpec) -> Result<ConfigObject, ConfigError> {
    let text = default_document(spec).to_string();
    let doc = writer::reparse(path, &text)?;
    writer::persist(path, &text)?;
    debug!(path = %path.display(), "created config file from defaults");
    Ok(resolve(doc, spec).0)
}

/// The defaults of `spec` as a commented document.
pub fn default_document(spec: &ConfigSpec) -> Document {
    let mut doc = Document::new();
    let mut has_content = false;
    fill_defaults(doc.root_mut(), spec.root(), &mut has_content);
    doc
}

fn fill_defaults(raw: &mut appconf_ini::Section, spec: &SectionSpec, has_content: &mut bool) {
    for field in spec.fields() {
        let entry = raw.set(field.key(), field.default_value().to_raw());
        if let Some(doc) = field.doc() {
            entry.set_comments(comment_lines(doc));
        }
        *has_content = true;
    }

    for child_spec in spec.sections() {
        let child = raw.child_or_insert(child_spec.name());
        let mut comments = Vec::new();
        if *has_content {
            comments.push(String::new());
        }
        if let Some(doc) = child_spec.doc_text() {
            comments.extend(comment_lines(doc));
        }
        child.set_comments(comments);
        *has_content = true;
        fill_defaults(child, child_spec, has_content);
    }
}

fn comment_lines(doc: &str) -> Vec<String> {
    doc.lines()
        .map(|line| {
            if line.trim().is_empty() {
                "#".to_string()
            } else {
                format!("# {line}")
            }
        })
        .collect()
}
