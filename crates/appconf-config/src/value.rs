// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed setting values and the per-type coercion from raw file text.

use std::fmt;

use appconf_ini::value::needs_quotes;
use appconf_ini::RawValue;
use thiserror::Error;

/// The declared type of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Integer,
    Float,
    Boolean,
    List,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Boolean => "boolean",
            ValueType::List => "list",
        })
    }
}

/// A resolved, typed setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<String>),
}

/// A raw value that does not convert to the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found `{found}`")]
pub struct CoerceError {
    pub expected: ValueType,
    /// The raw value as written in the file.
    pub found: String,
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::String(_) => ValueType::String,
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Boolean(_) => ValueType::Boolean,
            Value::List(_) => ValueType::List,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, and integers widened to `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Convert raw file text to `ty`.
    ///
    /// Unquoted numbers and `true`/`false` are not accepted as strings, so a
    /// string setting written as `42` is a mismatch while `"42"` is not.
    pub fn coerce(raw: &RawValue, ty: ValueType) -> Result<Value, CoerceError> {
        let mismatch = || CoerceError {
            expected: ty,
            found: raw.to_string(),
        };

        match (ty, raw) {
            (ValueType::List, RawValue::List(items)) => Ok(Value::List(items.clone())),
            (ValueType::List, RawValue::Scalar { text, quoted }) => {
                if text.is_empty() && !quoted {
                    Ok(Value::List(Vec::new()))
                } else {
                    Ok(Value::List(vec![text.clone()]))
                }
            }
            (_, RawValue::List(_)) => Err(mismatch()),
            (ValueType::String, RawValue::Scalar { text, quoted }) => {
                if !quoted && is_typed_literal(text) {
                    Err(mismatch())
                } else {
                    Ok(Value::String(text.clone()))
                }
            }
            (ValueType::Integer, RawValue::Scalar { text, .. }) => text
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| mismatch()),
            (ValueType::Float, RawValue::Scalar { text, .. }) => text
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| mismatch()),
            (ValueType::Boolean, RawValue::Scalar { text, .. }) => {
                parse_bool(text.trim()).map(Value::Boolean).ok_or_else(mismatch)
            }
        }
    }

    /// The raw form written to a file. Strings that would read back as a
    /// different type are quoted.
    pub fn to_raw(&self) -> RawValue {
        match self {
            Value::String(s) => {
                if needs_quotes(s) || is_typed_literal(s) {
                    RawValue::quoted(s.as_str())
                } else {
                    RawValue::unquoted(s.as_str())
                }
            }
            Value::Integer(i) => RawValue::unquoted(i.to_string()),
            Value::Float(f) => RawValue::unquoted(format!("{f:?}")),
            Value::Boolean(b) => RawValue::unquoted(b.to_string()),
            Value::List(items) => RawValue::List(items.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_raw())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Bare text that reads as a number or a boolean rather than a string.
fn is_typed_literal(text: &str) -> bool {
    text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false") || is_numeric(text)
}

/// Decimal integers and floats with an optional sign and exponent.
fn is_numeric(text: &str) -> bool {
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
        None => (body, None),
    };

    let mut parts = mantissa.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let frac = parts.next().unwrap_or("");
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() && frac.is_empty() {
        return false;
    }
    if !all_digits(whole) || !all_digits(frac) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !digits.is_empty() && all_digits(digits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_number_is_not_a_string() {
        let err = Value::coerce(&RawValue::unquoted("42"), ValueType::String).unwrap_err();
        assert_eq!(err.expected, ValueType::String);
        assert_eq!(err.found, "42");
    }

    #[test]
    fn quoted_number_is_a_string() {
        assert_eq!(
            Value::coerce(&RawValue::quoted("42"), ValueType::String),
            Ok(Value::String("42".to_string()))
        );
    }

    #[test]
    fn integers_accept_quotes_and_signs() {
        assert_eq!(Value::coerce(&RawValue::quoted("7"), ValueType::Integer), Ok(Value::Integer(7)));
        assert_eq!(Value::coerce(&RawValue::unquoted("-3"), ValueType::Integer), Ok(Value::Integer(-3)));
        assert!(Value::coerce(&RawValue::unquoted("3.5"), ValueType::Integer).is_err());
    }

    #[test]
    fn float_accepts_integers() {
        assert_eq!(Value::coerce(&RawValue::unquoted("2"), ValueType::Float), Ok(Value::Float(2.0)));
    }

    #[test]
    fn boolean_spellings() {
        for (text, expected) in [("Yes", true), ("off", false), ("1", true), ("FALSE", false)] {
            assert_eq!(
                Value::coerce(&RawValue::unquoted(text), ValueType::Boolean),
                Ok(Value::Boolean(expected)),
                "{text}"
            );
        }
        assert!(Value::coerce(&RawValue::unquoted("maybe"), ValueType::Boolean).is_err());
    }

    #[test]
    fn lists_from_scalars() {
        assert_eq!(Value::coerce(&RawValue::unquoted(""), ValueType::List), Ok(Value::List(vec![])));
        assert_eq!(
            Value::coerce(&RawValue::unquoted("one"), ValueType::List),
            Ok(Value::List(vec!["one".to_string()]))
        );
        assert!(Value::coerce(&RawValue::list(["a"]), ValueType::String).is_err());
    }

    #[test]
    fn numeric_detection() {
        for yes in ["0", "-1", "+2.5", ".5", "5.", "1e3", "2.5E-4"] {
            assert!(is_numeric(yes), "{yes}");
        }
        for no in ["", ".", "1e", "e3", "inf", "nan", "1.2.3", "0x10", "12ab"] {
            assert!(!is_numeric(no), "{no}");
        }
    }

    #[test]
    fn to_raw_quotes_ambiguous_strings() {
        assert_eq!(Value::from("42").to_raw(), RawValue::quoted("42"));
        assert_eq!(Value::from("True").to_raw(), RawValue::quoted("True"));
        assert_eq!(Value::from("vim").to_raw(), RawValue::unquoted("vim"));
        assert_eq!(Value::Float(1.0).to_raw(), RawValue::unquoted("1.0"));
    }

    #[test]
    fn to_raw_reads_back_as_same_value() {
        let values = [
            Value::from("it's, complicated"),
            Value::from(""),
            Value::Integer(-12),
            Value::Float(0.25),
            Value::Boolean(false),
            Value::from(vec!["a", "b c"]),
        ];
        for value in values {
            let back = Value::coerce(&value.to_raw(), value.value_type()).unwrap();
            assert_eq!(back, value);
        }
    }
}
