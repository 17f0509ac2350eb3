// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declared settings: which sections and keys an application knows about,
//! their defaults, types and optional validators.
//!
//! A [`ConfigSpec`] is an ordinary value built by the application at
//! startup and passed by reference to [`load`](crate::store::load).
//! Declaring the same (section, key) twice replaces the earlier
//! declaration in place.

use std::fmt;
use std::sync::Arc;

use appconf_ini::RawValue;
use tracing::debug;

use crate::value::{Value, ValueType};

/// A predicate applied to a value after type coercion.
#[derive(Clone)]
pub struct Validator {
    description: String,
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Validator {
    /// `description` is shown to users as the expected value when the
    /// check fails, e.g. "one of: vim, nano".
    pub fn new(
        description: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            check: Arc::new(check),
        }
    }

    /// Accept strings (or every item of a list) from a fixed set.
    pub fn one_of<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
        let description = format!("one of: {}", choices.join(", "));
        Self::new(description, move |value| match value {
            Value::String(s) => choices.contains(s),
            Value::List(items) => items.iter().all(|item| choices.contains(item)),
            _ => false,
        })
    }

    /// Accept integers or floats within `min..=max`.
    pub fn range(min: i64, max: i64) -> Self {
        Self::new(format!("a number from {min} to {max}"), move |value| {
            value
                .as_float()
                .is_some_and(|n| n >= min as f64 && n <= max as f64)
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn accepts(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// One declared setting. The type is the type of its default.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    key: String,
    default: Value,
    validator: Option<Validator>,
    doc: Option<String>,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            default: default.into(),
            validator: None,
            doc: None,
        }
    }

    pub fn string(key: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(key, Value::String(default.into()))
    }

    pub fn integer(key: impl Into<String>, default: i64) -> Self {
        Self::new(key, Value::Integer(default))
    }

    pub fn float(key: impl Into<String>, default: f64) -> Self {
        Self::new(key, Value::Float(default))
    }

    pub fn boolean(key: impl Into<String>, default: bool) -> Self {
        Self::new(key, Value::Boolean(default))
    }

    pub fn list<I, S>(key: impl Into<String>, default: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(key, Value::List(default.into_iter().map(Into::into).collect()))
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Help text, written as a comment above the key in new files.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn value_type(&self) -> ValueType {
        self.default.value_type()
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Coerce and validate a raw value. On failure returns the description
    /// of what was expected.
    pub fn check(&self, raw: &RawValue) -> Result<Value, String> {
        let value = Value::coerce(raw, self.value_type()).map_err(|e| e.expected.to_string())?;
        match &self.validator {
            Some(v) if !v.accepts(&value) => Err(v.description().to_string()),
            _ => Ok(value),
        }
    }
}

/// A declared section with its fields and nested sections, in
/// declaration order.
#[derive(Debug, Clone, Default)]
pub struct SectionSpec {
    name: String,
    fields: Vec<FieldSpec>,
    sections: Vec<SectionSpec>,
    doc: Option<String>,
}

impl SectionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }

    pub fn doc_text(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn get_field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn get_section(&self, name: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Declare a field. An existing field with the same key is replaced
    /// where it stands.
    pub fn field(&mut self, field: FieldSpec) -> &mut Self {
        match self.fields.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => {
                debug!(
                    section = %self.name,
                    key = %field.key,
                    "field declared again, replacing earlier declaration"
                );
                *existing = field;
            }
            None => self.fields.push(field),
        }
        self
    }

    /// The named child section, declared empty on first use.
    pub fn section(&mut self, name: &str) -> &mut SectionSpec {
        match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => &mut self.sections[idx],
            None => {
                self.sections.push(SectionSpec::new(name));
                let last = self.sections.len() - 1;
                &mut self.sections[last]
            }
        }
    }

    /// Help text written above the section header in new files.
    pub fn doc(&mut self, doc: impl Into<String>) -> &mut Self {
        self.doc = Some(doc.into());
        self
    }

    pub(crate) fn field_keys(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.key.as_str()).collect()
    }

    pub(crate) fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Every setting an application declares.
///
/// ```
/// use appconf_config::spec::{ConfigSpec, FieldSpec, Validator};
///
/// let mut spec = ConfigSpec::new();
/// spec.section("core")
///     .field(FieldSpec::string("editor", "vim").with_doc("Command used to edit entries."))
///     .field(FieldSpec::integer("width", 80).with_validator(Validator::range(20, 400)));
/// assert_eq!(spec.lookup(&["core"], "width").unwrap().default_value().as_integer(), Some(80));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigSpec {
    root: SectionSpec,
}

impl ConfigSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// The nameless root section, holding keys that appear before any header.
    pub fn root(&self) -> &SectionSpec {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SectionSpec {
        &mut self.root
    }

    /// A top-level section, declared empty on first use.
    pub fn section(&mut self, name: &str) -> &mut SectionSpec {
        self.root.section(name)
    }

    /// Declare `field` in the section at `section_path`, creating sections
    /// along the way. An empty path declares a root-level key.
    pub fn register<S: AsRef<str>>(&mut self, section_path: &[S], field: FieldSpec) {
        let mut section = &mut self.root;
        for name in section_path {
            section = section.section(name.as_ref());
        }
        section.field(field);
    }

    pub fn lookup<S: AsRef<str>>(&self, section_path: &[S], key: &str) -> Option<&FieldSpec> {
        self.section_spec(section_path)?.get_field(key)
    }

    pub fn section_spec<S: AsRef<str>>(&self, section_path: &[S]) -> Option<&SectionSpec> {
        section_path
            .iter()
            .try_fold(&self.root, |section, name| section.get_section(name.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_creates_nested_sections() {
        let mut spec = ConfigSpec::new();
        spec.register(&["term", "colors"], FieldSpec::string("fg", "white"));
        let field = spec.lookup(&["term", "colors"], "fg").unwrap();
        assert_eq!(field.value_type(), ValueType::String);
        assert!(spec.lookup(&["term"], "fg").is_none());
    }

    #[test]
    fn redeclaring_a_field_keeps_the_last_one_in_place() {
        let mut spec = ConfigSpec::new();
        spec.section("core")
            .field(FieldSpec::string("editor", "vim"))
            .field(FieldSpec::integer("width", 80));
        spec.register(&["core"], FieldSpec::string("editor", "nano"));

        let core = spec.section_spec(&["core"]).unwrap();
        let keys: Vec<&str> = core.fields().iter().map(FieldSpec::key).collect();
        assert_eq!(keys, ["editor", "width"]);
        assert_eq!(
            core.get_field("editor").unwrap().default_value(),
            &Value::from("nano")
        );
    }

    #[test]
    fn root_keys_use_an_empty_path() {
        let mut spec = ConfigSpec::new();
        let empty: [&str; 0] = [];
        spec.register(&empty, FieldSpec::boolean("verbose", false));
        assert!(spec.lookup(&empty, "verbose").is_some());
    }

    #[test]
    fn check_applies_validator_after_coercion() {
        let field = FieldSpec::string("level", "warn")
            .with_validator(Validator::one_of(["error", "warn", "info"]));
        assert_eq!(field.check(&RawValue::unquoted("info")), Ok(Value::from("info")));
        assert_eq!(
            field.check(&RawValue::unquoted("loud")),
            Err("one of: error, warn, info".to_string())
        );
        assert_eq!(field.check(&RawValue::unquoted("3")), Err("string".to_string()));
    }

    #[test]
    fn range_validator_bounds_are_inclusive() {
        let v = Validator::range(1, 10);
        assert!(v.accepts(&Value::Integer(1)));
        assert!(v.accepts(&Value::Float(10.0)));
        assert!(!v.accepts(&Value::Integer(11)));
        assert!(!v.accepts(&Value::from("5")));
    }

    #[test]
    fn validator_debug_shows_description() {
        let v = Validator::one_of(["a"]);
        assert_eq!(format!("{v:?}"), "Validator { description: \"one of: a\", .. }");
    }
}
