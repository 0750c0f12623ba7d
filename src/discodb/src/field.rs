//! PixelCrushers field lists and their normalized form
//!
//! Every database record carries an ordered list of `{title, value, type}`
//! triples. Values are stored as strings; the `type` tag says how to read
//! them. [`normalize`] flattens such a list into a [`Fields`] map with the
//! numeric and boolean tags applied.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Field type tag for floating point values
pub const FIELD_TYPE_NUMBER: i64 = 1;

/// Field type tag for boolean values
pub const FIELD_TYPE_BOOLEAN: i64 = 3;

/// A single field as stored in the decoded database
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawField {
    #[serde(default)]
    pub title: String,
    /// String payload; `None` when the source value is null or missing
    #[serde(default, deserialize_with = "stringly")]
    pub value: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: i64,
}

impl RawField {
    pub fn new(title: &str, value: &str, kind: i64) -> Self {
        Self {
            title: title.to_string(),
            value: Some(value.to_string()),
            kind,
        }
    }
}

/// Accept strings, numbers and booleans as a string payload
fn stringly<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// A coerced field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    /// Whole-number default for an absent field; coerced fields are always `Number`
    Integer(i64),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Apply the coercion selected by a field type tag
    pub fn coerce(raw: &str, kind: i64) -> Self {
        match kind {
            FIELD_TYPE_NUMBER => match raw.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => FieldValue::Number(n),
                _ => FieldValue::Text(raw.to_string()),
            },
            FIELD_TYPE_BOOLEAN => {
                let lower = raw.to_lowercase();
                FieldValue::Bool(lower == "true" || lower == "1")
            }
            _ => FieldValue::Text(raw.to_string()),
        }
    }

    /// Only the empty string counts as empty; `false` and `0` are values
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Integer(n) => *n != 0,
            FieldValue::Number(n) => *n != 0.0,
            FieldValue::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(n) => Some(*n as f64),
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn empty() -> Self {
        FieldValue::Text(String::new())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Number(n) => write!(f, "{}", format_number(*n)),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl PartialEq<&str> for FieldValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// Render a float the way the game tools print them (`2.0`, `0.25`)
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{:.1}", n)
    } else {
        format!("{}", n)
    }
}

/// Normalized record: unique titles in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, FieldValue)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. A replaced title keeps its position.
    pub fn insert(&mut self, title: impl Into<String>, value: FieldValue) {
        let title = title.into();
        match self.entries.iter_mut().find(|(t, _)| *t == title) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((title, value)),
        }
    }

    pub fn get(&self, title: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    /// Value for `title`, or `default` when absent
    pub fn value_or(&self, title: &str, default: FieldValue) -> FieldValue {
        self.get(title).cloned().unwrap_or(default)
    }

    /// Value for `title`, or the empty string when absent
    pub fn value_or_empty(&self, title: &str) -> FieldValue {
        self.value_or(title, FieldValue::empty())
    }

    /// String form of a value, empty when absent
    pub fn text(&self, title: &str) -> String {
        self.get(title).map(|v| v.to_string()).unwrap_or_default()
    }

    /// Truthiness of a value, false when absent
    pub fn flag(&self, title: &str) -> bool {
        self.get(title).map(FieldValue::is_truthy).unwrap_or(false)
    }

    /// Numeric value, only for fields coerced to numbers
    pub fn number(&self, title: &str) -> Option<f64> {
        self.get(title).and_then(FieldValue::as_f64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (title, value) in iter {
            fields.insert(title, value);
        }
        fields
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (title, value) in &self.entries {
            map.serialize_entry(title, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = Fields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field titles to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Fields, A::Error> {
                let mut fields = Fields::new();
                while let Some((title, value)) = access.next_entry::<String, FieldValue>()? {
                    fields.insert(title, value);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// Flatten a field list into a normalized record
///
/// Fields are visited left to right. Numeric (`type == 1`) and boolean
/// (`type == 3`) tags are applied, empty strings and missing values are
/// dropped, and a repeated title overwrites the earlier value.
pub fn normalize(fields: &[RawField]) -> Fields {
    let mut out = Fields::new();

    for field in fields {
        let Some(raw) = field.value.as_deref() else {
            continue;
        };

        let value = FieldValue::coerce(raw, field.kind);
        if value.is_empty() {
            continue;
        }

        out.insert(field.title.clone(), value);
    }

    out
}
