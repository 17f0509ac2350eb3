// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Syntax errors raised while parsing a document.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// What went wrong on the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The line is neither a comment, a section header nor a `key = value` pair.
    #[error("invalid line, expected `key = value` or a `[section]` header")]
    InvalidLine,

    /// A `key = value` line with nothing before the `=`.
    #[error("missing key before `=`")]
    MissingKey,

    /// A quoted key or value without its closing quote.
    #[error("unterminated quoted string")]
    UnterminatedQuote,

    /// A `"""` or `'''` value that runs to the end of the file.
    #[error("unterminated triple-quoted value")]
    UnterminatedMultiline,

    /// Opening and closing bracket counts of a header differ.
    #[error("section header brackets do not match")]
    MismatchedBrackets,

    /// A header such as `[]` or `[  ]`.
    #[error("empty section name")]
    EmptySectionName,

    /// A header nested more than one level below the current section.
    #[error("section nested too deeply (depth {depth}, at most {max} allowed here)")]
    NestingTooDeep {
        /// Bracket depth found in the header.
        depth: usize,
        /// Deepest nesting permitted at this point.
        max: usize,
    },

    /// Text after a closing quote or header that is not a `#` comment.
    #[error("unexpected characters after value")]
    TrailingCharacters,
}

/// A fatal syntax error, carrying the source for miette rendering.
#[derive(Debug, Error, Diagnostic)]
#[error("{kind} (line {line}, column {column})")]
#[diagnostic(code(appconf::ini::parse))]
pub struct ParseError {
    /// The category of syntax problem.
    pub kind: ParseErrorKind,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column (in characters).
    pub column: usize,
    #[label("here")]
    span: SourceSpan,
    #[source_code]
    src: NamedSource<String>,
    #[help]
    help: Option<String>,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, name: &str, src: &str, offset: usize) -> Self {
        let offset = offset.min(src.len());
        let before = &src[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        let len = src[offset..]
            .chars()
            .next()
            .filter(|c| *c != '\n')
            .map(char::len_utf8)
            .unwrap_or(0);
        let help = help_for(&kind);

        Self {
            kind,
            line,
            column,
            span: SourceSpan::new(offset.into(), len),
            src: NamedSource::new(name, src.to_string()),
            help,
        }
    }

    /// Byte offset of the offending character in the source.
    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

fn help_for(kind: &ParseErrorKind) -> Option<String> {
    match kind {
        ParseErrorKind::InvalidLine => {
            Some("comment the line out with `#` or add `= value`".to_string())
        }
        ParseErrorKind::UnterminatedQuote => Some("add the closing quote".to_string()),
        ParseErrorKind::UnterminatedMultiline => {
            Some("close the value with the same triple quote it opened with".to_string())
        }
        ParseErrorKind::NestingTooDeep { .. } => {
            Some("sub-sections use one more bracket than their parent".to_string())
        }
        ParseErrorKind::TrailingCharacters => {
            Some("separate list items with `,` and start comments with `#`".to_string())
        }
        _ => None,
    }
}
