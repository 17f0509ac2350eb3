// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Non-fatal problems found while loading a config file.

use std::fmt;

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
/// Catches typos like `editr` -> `editor` without suggesting unrelated names.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A data problem in an otherwise readable file. Loading continues past
/// every one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A section the application does not declare. Its keys are kept but
    /// not reported one by one.
    UnknownSection {
        section: Vec<String>,
        line: usize,
        suggestion: Option<String>,
    },
    /// An undeclared key inside a declared section.
    UnknownKey {
        section: Vec<String>,
        key: String,
        raw_value: String,
        line: usize,
        suggestion: Option<String>,
    },
    /// A key set more than once in one section. The last value wins.
    DuplicateKey {
        section: Vec<String>,
        key: String,
        raw_value: String,
        first_line: usize,
        line: usize,
    },
    /// A value that is not of the declared type, or that the field's
    /// validator rejects. The default is used instead.
    TypeMismatch {
        section: Vec<String>,
        key: String,
        raw_value: String,
        expected: String,
        line: usize,
    },
}

/// Issue categories, in the order reports list them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IssueKind {
    UnknownSection,
    UnknownKey,
    DuplicateKey,
    TypeMismatch,
}

impl IssueKind {
    /// Heading used when reports group issues.
    pub fn heading(self) -> &'static str {
        match self {
            IssueKind::UnknownSection => "unknown sections",
            IssueKind::UnknownKey => "unknown settings",
            IssueKind::DuplicateKey => "duplicate settings",
            IssueKind::TypeMismatch => "invalid values",
        }
    }
}

impl ValidationIssue {
    pub fn kind(&self) -> IssueKind {
        match self {
            ValidationIssue::UnknownSection { .. } => IssueKind::UnknownSection,
            ValidationIssue::UnknownKey { .. } => IssueKind::UnknownKey,
            ValidationIssue::DuplicateKey { .. } => IssueKind::DuplicateKey,
            ValidationIssue::TypeMismatch { .. } => IssueKind::TypeMismatch,
        }
    }

    /// 1-based source line of the offending item.
    pub fn line(&self) -> usize {
        match self {
            ValidationIssue::UnknownSection { line, .. }
            | ValidationIssue::UnknownKey { line, .. }
            | ValidationIssue::DuplicateKey { line, .. }
            | ValidationIssue::TypeMismatch { line, .. } => *line,
        }
    }

    pub fn section(&self) -> &[String] {
        match self {
            ValidationIssue::UnknownSection { section, .. }
            | ValidationIssue::UnknownKey { section, .. }
            | ValidationIssue::DuplicateKey { section, .. }
            | ValidationIssue::TypeMismatch { section, .. } => section,
        }
    }

    /// The key involved, or `None` for section-level issues.
    pub fn key(&self) -> Option<&str> {
        match self {
            ValidationIssue::UnknownSection { .. } => None,
            ValidationIssue::UnknownKey { key, .. }
            | ValidationIssue::DuplicateKey { key, .. }
            | ValidationIssue::TypeMismatch { key, .. } => Some(key),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnknownSection {
                section,
                suggestion,
                ..
            } => {
                write!(f, "unknown section `[{}]`", section.join("."))?;
                write_suggestion(f, suggestion.as_deref())
            }
            ValidationIssue::UnknownKey {
                section,
                key,
                suggestion,
                ..
            } => {
                write!(f, "unknown setting `{}`", dotted(section, key))?;
                write_suggestion(f, suggestion.as_deref())
            }
            ValidationIssue::DuplicateKey {
                section,
                key,
                raw_value,
                first_line,
                ..
            } => write!(
                f,
                "`{}` is already set on line {first_line}; using the later value `{raw_value}`",
                dotted(section, key)
            ),
            ValidationIssue::TypeMismatch {
                section,
                key,
                raw_value,
                expected,
                ..
            } => write!(
                f,
                "`{}` expected {expected}, found `{raw_value}`; using the default",
                dotted(section, key)
            ),
        }
    }
}

fn write_suggestion(f: &mut fmt::Formatter<'_>, suggestion: Option<&str>) -> fmt::Result {
    match suggestion {
        Some(s) => write!(f, "; did you mean `{s}`?"),
        None => Ok(()),
    }
}

fn dotted(section: &[String], key: &str) -> String {
    if section.is_empty() {
        key.to_string()
    } else {
        format!("{}.{key}", section.join("."))
    }
}

/// The closest declared name to `unknown`, if any is close enough.
pub fn suggest_name(unknown: &str, candidates: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &candidate in candidates {
        let score = strsim::jaro_winkler(unknown, candidate);
        if score > best_score {
            best_score = score;
            best_match = Some(candidate.to_string());
        }
    }

    best_match
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_name_typo() {
        assert_eq!(
            suggest_name("editr", &["editor", "pager"]),
            Some("editor".to_string())
        );
    }

    #[test]
    fn suggest_name_no_match() {
        assert_eq!(suggest_name("zzzzz", &["editor", "pager"]), None);
    }

    #[test]
    fn messages_name_the_dotted_key() {
        let issue = ValidationIssue::UnknownKey {
            section: vec!["core".into()],
            key: "editr".into(),
            raw_value: "vim".into(),
            line: 3,
            suggestion: Some("editor".into()),
        };
        assert_eq!(
            issue.to_string(),
            "unknown setting `core.editr`; did you mean `editor`?"
        );
        assert_eq!(issue.kind(), IssueKind::UnknownKey);
        assert_eq!(issue.line(), 3);
        assert_eq!(issue.key(), Some("editr"));
    }

    #[test]
    fn mismatch_message_shows_expected_and_found() {
        let issue = ValidationIssue::TypeMismatch {
            section: vec!["core".into()],
            key: "editor".into(),
            raw_value: "42".into(),
            expected: "string".into(),
            line: 2,
        };
        assert_eq!(
            issue.to_string(),
            "`core.editor` expected string, found `42`; using the default"
        );
    }

    #[test]
    fn nested_section_names_are_dotted() {
        let issue = ValidationIssue::UnknownSection {
            section: vec!["term".into(), "colours".into()],
            line: 9,
            suggestion: None,
        };
        assert_eq!(issue.to_string(), "unknown section `[term.colours]`");
        assert_eq!(issue.key(), None);
    }

    #[test]
    fn kinds_sort_in_report_order() {
        let mut kinds = vec![
            IssueKind::TypeMismatch,
            IssueKind::UnknownSection,
            IssueKind::DuplicateKey,
            IssueKind::UnknownKey,
        ];
        kinds.sort();
        assert_eq!(
            kinds,
            [
                IssueKind::UnknownSection,
                IssueKind::UnknownKey,
                IssueKind::DuplicateKey,
                IssueKind::TypeMismatch
            ]
        );
    }
}
