// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Untyped values as they appear on the right-hand side of `=`.

use std::fmt;

/// A value exactly as written in the file, before any type coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// A single value. `quoted` records whether it was written in quotes,
    /// which callers use to tell `"42"` (text) apart from `42` (a number).
    Scalar { text: String, quoted: bool },
    /// A comma-separated list (`a, b`, `a,` or the empty list `,`).
    List(Vec<String>),
}

impl RawValue {
    /// A bare value. Values that cannot be written bare are quoted on output.
    pub fn unquoted(text: impl Into<String>) -> Self {
        RawValue::Scalar {
            text: text.into(),
            quoted: false,
        }
    }

    /// A value that is always written in quotes.
    pub fn quoted(text: impl Into<String>) -> Self {
        RawValue::Scalar {
            text: text.into(),
            quoted: true,
        }
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawValue::List(items.into_iter().map(Into::into).collect())
    }

    /// The scalar text, or `None` for lists.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            RawValue::Scalar { text, .. } => Some(text),
            RawValue::List(_) => None,
        }
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, RawValue::Scalar { quoted: true, .. })
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Scalar { text, quoted } => {
                if *quoted || needs_quotes(text) {
                    f.write_str(&quote(text))
                } else {
                    f.write_str(text)
                }
            }
            RawValue::List(items) => match items.as_slice() {
                [] => f.write_str(","),
                [only] => write!(f, "{},", list_item(only)),
                _ => {
                    let rendered: Vec<String> = items.iter().map(|i| list_item(i)).collect();
                    f.write_str(&rendered.join(", "))
                }
            },
        }
    }
}

/// Whether `text` would change meaning if written without quotes.
pub fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text.trim() != text
        || text.contains([',', '#', '"', '\'', '\n'])
}

/// Quote `text`, picking a delimiter that does not occur inside it.
///
/// Text containing a newline, or both quote characters, is written
/// triple-quoted. A triple delimiter only fits when the text neither
/// contains it nor ends with its quote character. Text that fits neither
/// (`"""` inside and a trailing `'`, or the reverse) has no quoted form;
/// it is returned in `'''` and does not parse back.
pub fn quote(text: &str) -> String {
    let has_double = text.contains('"');
    let has_single = text.contains('\'');
    if !text.contains('\n') && !(has_double && has_single) {
        return if has_double {
            format!("'{text}'")
        } else {
            format!("\"{text}\"")
        };
    }
    let fits = |delim: &str, q: char| !text.contains(delim) && !text.ends_with(q);
    if fits("\"\"\"", '"') {
        format!("\"\"\"{text}\"\"\"")
    } else {
        format!("'''{text}'''")
    }
}

// List items cannot be triple-quoted; an item holding both quote characters
// or a newline is not representable and falls back to double quotes.
fn list_item(item: &str) -> String {
    if !needs_quotes(item) {
        item.to_string()
    } else if item.contains('"') && !item.contains('\'') {
        format!("'{item}'")
    } else {
        format!("\"{item}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_scalar_renders_as_is() {
        assert_eq!(RawValue::unquoted("vim").to_string(), "vim");
    }

    #[test]
    fn unsafe_bare_scalar_is_quoted() {
        assert_eq!(RawValue::unquoted("a, b").to_string(), "\"a, b\"");
        assert_eq!(RawValue::unquoted("").to_string(), "\"\"");
        assert_eq!(RawValue::unquoted(" padded").to_string(), "\" padded\"");
    }

    #[test]
    fn quote_picks_free_delimiter() {
        assert_eq!(quote("say \"hi\""), "'say \"hi\"'");
        assert_eq!(quote("it's"), "\"it's\"");
        assert_eq!(quote("it's \"x\""), "'''it's \"x\"'''");
        assert_eq!(quote("line1\nline2"), "\"\"\"line1\nline2\"\"\"");
    }

    #[test]
    fn quote_avoids_closing_ambiguity() {
        assert_eq!(quote("it's \"x"), "\"\"\"it's \"x\"\"\"");
        assert_eq!(quote("ends with 'q' \""), "'''ends with 'q' \"'''");
    }

    #[test]
    fn text_fitting_neither_triple_delimiter_has_no_quoted_form() {
        let quoted = quote("x\"\"\"y'");
        assert_eq!(quoted, "'''x\"\"\"y''''");
        assert!(crate::Document::parse(&format!("k = {quoted}\n")).is_err());
    }

    #[test]
    fn scalar_text_is_exposed_for_scalars_only() {
        assert_eq!(RawValue::quoted("42").as_scalar(), Some("42"));
        assert_eq!(RawValue::list(["a"]).as_scalar(), None);
    }

    #[test]
    fn list_shapes() {
        assert_eq!(RawValue::List(vec![]).to_string(), ",");
        assert_eq!(RawValue::list(["one"]).to_string(), "one,");
        assert_eq!(RawValue::list(["a", "b c", "d,e"]).to_string(), "a, b c, \"d,e\"");
    }
}
