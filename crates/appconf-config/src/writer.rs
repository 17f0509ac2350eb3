// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisting a [`ConfigObject`].
//!
//! The object's source document is updated in place: lines whose value did
//! not change are written back byte for byte, changed values are rewritten
//! on their own line, and new settings are appended to their section.

use std::fs;
use std::path::Path;

use appconf_ini::Document;
use tracing::debug;

use crate::error::ConfigError;
use crate::object::{ConfigObject, Section};
use crate::value::Value;

/// Write `config` to `path`, creating parent directories as needed.
///
/// Nothing is written when the rendered text would not load back. That
/// happens for a string containing `"""` that ends in `'` (or the reverse)
/// and for a list item holding a newline or both quote characters.
pub fn write(path: &Path, config: &ConfigObject) -> Result<(), ConfigError> {
    let text = to_ini_string(config);
    reparse(path, &text)?;
    persist(path, &text)
}

/// The text [`write`] would produce.
pub fn to_ini_string(config: &ConfigObject) -> String {
    render(config).to_string()
}

/// Merge `config` into a copy of its source document.
pub fn render(config: &ConfigObject) -> Document {
    let mut doc = config.source().cloned().unwrap_or_default();
    sync_section(doc.root_mut(), config.root());
    doc
}

pub(crate) fn reparse(path: &Path, text: &str) -> Result<Document, ConfigError> {
    Document::parse_named(&path.display().to_string(), text).map_err(|source| {
        ConfigError::Unrepresentable {
            path: path.to_path_buf(),
            source,
        }
    })
}

pub(crate) fn persist(path: &Path, text: &str) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, text).map_err(write_err)?;
    debug!(path = %path.display(), bytes = text.len(), "wrote config file");
    Ok(())
}

fn sync_section(raw: &mut appconf_ini::Section, section: &Section) {
    let dropped: Vec<String> = raw
        .entries()
        .iter()
        .map(|e| e.key().to_string())
        .filter(|key| !section.retains_key(key))
        .collect();
    for key in &dropped {
        raw.remove(key);
    }

    for (key, value) in section.values() {
        if !same_value(raw.get(key), value) {
            raw.set(key, value.to_raw());
        }
    }
    for (key, value) in section.unexpected() {
        raw.set(key, value.clone());
    }

    let dropped: Vec<String> = raw
        .children()
        .iter()
        .map(|c| c.name().to_string())
        .filter(|name| !section.retains_section(name))
        .collect();
    for name in &dropped {
        raw.remove_child(name);
    }

    for (name, child) in section.sections() {
        let is_new = raw.child(name).is_none();
        let needs_gap = !raw.entries().is_empty() || !raw.children().is_empty();
        let raw_child = raw.child_or_insert(name);
        if is_new && needs_gap {
            raw_child.set_comments(vec![String::new()]);
        }
        sync_section(raw_child, child);
    }
    for unexpected in section.unexpected_sections() {
        if raw.child(unexpected.name()) != Some(unexpected) {
            raw.push_child(unexpected.clone());
        }
    }
}

/// Whether the file text already reads as `value`, so its line can stay.
fn same_value(existing: Option<&appconf_ini::RawValue>, value: &Value) -> bool {
    existing
        .and_then(|raw| Value::coerce(raw, value.value_type()).ok())
        .is_some_and(|current| &current == value)
}
