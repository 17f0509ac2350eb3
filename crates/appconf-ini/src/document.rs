// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The in-memory document tree: sections, entries and their comments.
//!
//! Every comment or blank line is attached to the item that follows it.
//! Comments after the last item are kept on the [`Document`] itself.

use std::fmt;

use crate::error::ParseError;
use crate::parser;
use crate::value::{needs_quotes, quote, RawValue};

const INDENT: &str = "    ";

/// One `key = value` line (or several, for triple-quoted values).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub(crate) key: String,
    pub(crate) value: RawValue,
    pub(crate) comments: Vec<String>,
    pub(crate) inline_comment: Option<String>,
    pub(crate) indent: String,
    pub(crate) line: usize,
    /// Verbatim source text, dropped once the value is changed.
    pub(crate) original: Option<String>,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: RawValue) -> Self {
        Self {
            key: key.into(),
            value,
            comments: Vec::new(),
            inline_comment: None,
            indent: String::new(),
            line: 0,
            original: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &RawValue {
        &self.value
    }

    /// Replace the value. Setting an identical value keeps the original text.
    pub fn set_value(&mut self, value: RawValue) {
        if self.value != value {
            self.value = value;
            self.original = None;
        }
    }

    /// 1-based line the value was read from (the last occurrence of a
    /// repeated key), or 0 for entries added after parsing.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Comment and blank lines directly above the entry, verbatim.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn set_comments(&mut self, comments: Vec<String>) {
        self.comments = comments;
    }

    /// The trailing `# ...` comment, including the whitespace before it.
    pub fn inline_comment(&self) -> Option<&str> {
        self.inline_comment.as_deref()
    }

    fn render(&self) -> String {
        if let Some(original) = &self.original {
            return original.clone();
        }
        let key = if key_needs_quotes(&self.key) {
            quote(&self.key)
        } else {
            self.key.clone()
        };
        format!(
            "{}{} = {}{}",
            self.indent,
            key,
            self.value,
            self.inline_comment.as_deref().unwrap_or("")
        )
    }
}

/// A `[section]` and everything nested below it.
///
/// The document root is a nameless section at depth 0 holding the keys
/// that appear before the first header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub(crate) name: String,
    pub(crate) depth: usize,
    pub(crate) comments: Vec<String>,
    pub(crate) inline_comment: Option<String>,
    pub(crate) indent: String,
    pub(crate) line: usize,
    pub(crate) original: Option<String>,
    pub(crate) entries: Vec<Entry>,
    pub(crate) children: Vec<Section>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depth: 0,
            comments: Vec::new(),
            inline_comment: None,
            indent: String::new(),
            line: 0,
            original: None,
            entries: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bracket depth: 0 for the root, 1 for `[a]`, 2 for `[[b]]`.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// 1-based line of the header, or 0 for the root and added sections.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn set_comments(&mut self, comments: Vec<String>) {
        self.comments = comments;
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entry(key).map(|e| &e.value)
    }

    /// Update an existing entry in place, or append a new one.
    pub fn set(&mut self, key: &str, value: RawValue) -> &mut Entry {
        match self.entries.iter().position(|e| e.key == key) {
            Some(idx) => {
                let entry = &mut self.entries[idx];
                entry.set_value(value);
                entry
            }
            None => {
                let mut entry = Entry::new(key, value);
                entry.indent = self.entry_indent();
                self.entries.push(entry);
                let last = self.entries.len() - 1;
                &mut self.entries[last]
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let idx = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(idx))
    }

    pub fn children(&self) -> &[Section] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Section> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Return the named child, appending an empty one if it does not exist.
    pub fn child_or_insert(&mut self, name: &str) -> &mut Section {
        match self.children.iter().position(|c| c.name == name) {
            Some(idx) => &mut self.children[idx],
            None => self.push_child(Section::new(name)),
        }
    }

    /// Attach `child`, replacing any existing child of the same name.
    pub fn push_child(&mut self, mut child: Section) -> &mut Section {
        child.reparent(self.depth + 1);
        match self.children.iter().position(|c| c.name == child.name) {
            Some(idx) => {
                self.children[idx] = child;
                &mut self.children[idx]
            }
            None => {
                self.children.push(child);
                let last = self.children.len() - 1;
                &mut self.children[last]
            }
        }
    }

    pub fn remove_child(&mut self, name: &str) -> Option<Section> {
        let idx = self.children.iter().position(|c| c.name == name)?;
        Some(self.children.remove(idx))
    }

    /// Walk down a path of child names. An empty path is `self`.
    pub fn section<S: AsRef<str>>(&self, path: &[S]) -> Option<&Section> {
        path.iter()
            .try_fold(self, |section, name| section.child(name.as_ref()))
    }

    pub fn section_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Section> {
        let mut section = self;
        for name in path {
            section = section.child_mut(name.as_ref())?;
        }
        Some(section)
    }

    fn entry_indent(&self) -> String {
        match self.entries.last() {
            Some(e) => e.indent.clone(),
            None => INDENT.repeat(self.depth.saturating_sub(1)),
        }
    }

    fn reparent(&mut self, depth: usize) {
        if self.depth != depth {
            self.depth = depth;
            self.original = None;
            self.indent = INDENT.repeat(depth.saturating_sub(1));
        }
        for child in &mut self.children {
            child.reparent(depth + 1);
        }
    }

    fn render_header(&self) -> String {
        if let Some(original) = &self.original {
            return original.clone();
        }
        format!(
            "{}{}{}{}{}",
            self.indent,
            "[".repeat(self.depth),
            self.name,
            "]".repeat(self.depth),
            self.inline_comment.as_deref().unwrap_or("")
        )
    }

    fn render_into(&self, lines: &mut Vec<String>) {
        if self.depth > 0 {
            lines.extend(self.comments.iter().cloned());
            lines.push(self.render_header());
        }
        for entry in &self.entries {
            lines.extend(entry.comments.iter().cloned());
            lines.push(entry.render());
        }
        for child in &self.children {
            child.render_into(lines);
        }
    }
}

/// A key that occurred more than once in the same section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    /// Names of the enclosing sections, outermost first.
    pub section: Vec<String>,
    pub key: String,
    /// Line of the first occurrence.
    pub first_line: usize,
    /// Line of the last occurrence.
    pub line: usize,
    /// The value at the last occurrence, which replaced the earlier ones.
    pub value: RawValue,
}

/// A parsed (or freshly built) configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub(crate) root: Section,
    pub(crate) final_comments: Vec<String>,
    pub(crate) duplicates: Vec<DuplicateKey>,
    pub(crate) trailing_newline: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            root: Section::new(""),
            final_comments: Vec::new(),
            duplicates: Vec::new(),
            trailing_newline: true,
        }
    }

    /// Parse `src`, naming it `<inline>` in diagnostics.
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        Self::parse_named("<inline>", src)
    }

    /// Parse `src`; `name` (usually the file path) labels error snippets.
    pub fn parse_named(name: &str, src: &str) -> Result<Self, ParseError> {
        parser::parse(name, src)
    }

    pub fn root(&self) -> &Section {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Section {
        &mut self.root
    }

    pub fn section<S: AsRef<str>>(&self, path: &[S]) -> Option<&Section> {
        self.root.section(path)
    }

    pub fn section_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Section> {
        self.root.section_mut(path)
    }

    /// Keys repeated within a section, in file order. The document itself
    /// holds the last value seen for each.
    pub fn duplicates(&self) -> &[DuplicateKey] {
        &self.duplicates
    }

    /// Comment and blank lines after the last entry or header.
    pub fn final_comments(&self) -> &[String] {
        &self.final_comments
    }

    pub fn set_final_comments(&mut self, comments: Vec<String>) {
        self.final_comments = comments;
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        self.root.render_into(&mut lines);
        lines.extend(self.final_comments.iter().cloned());
        if lines.is_empty() {
            return Ok(());
        }
        f.write_str(&lines.join("\n"))?;
        if self.trailing_newline {
            f.write_str("\n")?;
        }
        Ok(())
    }
}

fn key_needs_quotes(key: &str) -> bool {
    needs_quotes(key) || key.contains('=') || key.starts_with(['[', ';'])
}
