// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The loaded configuration: typed values arranged in sections, plus
//! whatever the file contained that the application does not declare.
//!
//! Undeclared keys and sections live in a separate "unexpected" bucket so
//! that they are written back untouched but never mistaken for settings.

use std::fmt;

use appconf_ini::{Document, RawValue};

use crate::value::Value;

/// One section of a [`ConfigObject`].
///
/// Equality ignores ordering and layout: two sections are equal when they
/// hold the same values, child sections and unexpected data.
#[derive(Debug, Clone, Default)]
pub struct Section {
    values: Vec<(String, Value)>,
    sections: Vec<(String, Section)>,
    unexpected: Vec<(String, RawValue)>,
    unexpected_sections: Vec<appconf_ini::Section>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_integer)
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_float)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(Value::as_list)
    }

    /// Set a value, keeping its position if the key already exists.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((key.to_string(), value)),
        }
    }

    /// Remove a value. The key is dropped from the file on the next write.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.values.iter().position(|(k, _)| k == key)?;
        Some(self.values.remove(idx).1)
    }

    /// Values in file order, followed by defaults for keys the file lacked.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    /// The named child section, created empty if missing.
    pub fn section_or_insert(&mut self, name: &str) -> &mut Section {
        match self.sections.iter().position(|(n, _)| n == name) {
            Some(idx) => &mut self.sections[idx].1,
            None => {
                self.sections.push((name.to_string(), Section::new()));
                let last = self.sections.len() - 1;
                &mut self.sections[last].1
            }
        }
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        let idx = self.sections.iter().position(|(n, _)| n == name)?;
        Some(self.sections.remove(idx).1)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Undeclared keys, exactly as the file wrote them.
    pub fn unexpected(&self) -> &[(String, RawValue)] {
        &self.unexpected
    }

    pub fn unexpected_value(&self, key: &str) -> Option<&RawValue> {
        self.unexpected
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Undeclared sections, kept as raw document sections.
    pub fn unexpected_sections(&self) -> &[appconf_ini::Section] {
        &self.unexpected_sections
    }

    pub fn unexpected_section(&self, name: &str) -> Option<&appconf_ini::Section> {
        self.unexpected_sections.iter().find(|s| s.name() == name)
    }

    /// Forget an undeclared key so the next write drops it.
    pub fn discard_unexpected(&mut self, key: &str) -> Option<RawValue> {
        let idx = self.unexpected.iter().position(|(k, _)| k == key)?;
        Some(self.unexpected.remove(idx).1)
    }

    pub(crate) fn push_unexpected(&mut self, key: &str, value: RawValue) {
        self.unexpected.push((key.to_string(), value));
    }

    pub(crate) fn push_unexpected_section(&mut self, section: appconf_ini::Section) {
        self.unexpected_sections.push(section);
    }

    pub(crate) fn push_section(&mut self, name: &str, section: Section) {
        self.sections.push((name.to_string(), section));
    }

    /// Whether the writer should keep a key or child section of this name.
    pub(crate) fn retains_key(&self, key: &str) -> bool {
        self.get(key).is_some() || self.unexpected_value(key).is_some()
    }

    pub(crate) fn retains_section(&self, name: &str) -> bool {
        self.section(name).is_some() || self.unexpected_section(name).is_some()
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        same_pairs(&self.values, &other.values)
            && same_pairs(&self.sections, &other.sections)
            && same_pairs(&self.unexpected, &other.unexpected)
            && self.unexpected_sections.len() == other.unexpected_sections.len()
            && self.unexpected_sections.iter().all(|raw| {
                other
                    .unexpected_section(raw.name())
                    .is_some_and(|o| same_raw_content(raw, o))
            })
    }
}

/// Keyed pairs with unique keys, compared without regard to order.
fn same_pairs<T: PartialEq>(a: &[(String, T)], b: &[(String, T)]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(key, value)| b.iter().any(|(k, v)| k == key && v == value))
}

fn same_raw_content(a: &appconf_ini::Section, b: &appconf_ini::Section) -> bool {
    a.name() == b.name()
        && a.entries().len() == b.entries().len()
        && a.entries().iter().all(|e| b.get(e.key()) == Some(e.value()))
        && a.children().len() == b.children().len()
        && a.children()
            .iter()
            .all(|c| b.child(c.name()).is_some_and(|o| same_raw_content(c, o)))
}

/// A fully resolved configuration.
///
/// Every declared setting has a value. The parsed source document, when
/// there is one, is kept so that writing preserves comments and layout.
#[derive(Debug, Clone, Default)]
pub struct ConfigObject {
    root: Section,
    source: Option<Document>,
}

impl ConfigObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(root: Section, source: Option<Document>) -> Self {
        Self { root, source }
    }

    /// Root section, holding keys that appear before any header.
    pub fn root(&self) -> &Section {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Section {
        &mut self.root
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.root.section(name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.root.section_mut(name)
    }

    /// The section at a nested path. An empty path is the root.
    pub fn section_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&Section> {
        path.iter()
            .try_fold(&self.root, |section, name| section.section(name.as_ref()))
    }

    /// `key` in top-level `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.section(section)?.get(key)
    }

    pub fn get_in<S: AsRef<str>>(&self, path: &[S], key: &str) -> Option<&Value> {
        self.section_at(path)?.get(key)
    }

    /// Set `key` in top-level `section`, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        self.root.section_or_insert(section).set(key, value);
    }

    pub fn set_in<S: AsRef<str>>(&mut self, path: &[S], key: &str, value: impl Into<Value>) {
        let mut section = &mut self.root;
        for name in path {
            section = section.section_or_insert(name.as_ref());
        }
        section.set(key, value);
    }

    /// The document this object was loaded from, if any.
    pub fn source(&self) -> Option<&Document> {
        self.source.as_ref()
    }
}

impl PartialEq for ConfigObject {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl fmt::Display for ConfigObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::writer::to_ini_string(self))
    }
}
