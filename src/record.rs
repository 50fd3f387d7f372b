//! Record and identifier types
//!
//! Records are owned by the host's data source. The core only reads them:
//! a record is an identifier plus a mapping from field name to a scalar
//! value. Field access is lenient, so an absent field reads as empty text
//! rather than failing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Name of the implicit identifier field
pub const ID_FIELD: &str = "id";

/// Unique key of a record
///
/// Opaque beyond equality. Text that parses as an integer is coerced to
/// the integer form, so an id arriving as `"7"` from a UI event equals the
/// id `7` held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged, from = "RawIdentifier")]
pub enum Identifier {
    /// Numeric key
    Int(i64),
    /// Non-numeric key (uuid, slug, ...)
    Text(String),
}

/// Wire form before integer coercion
#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentifier {
    Int(i64),
    Text(String),
}

impl From<RawIdentifier> for Identifier {
    fn from(raw: RawIdentifier) -> Self {
        match raw {
            RawIdentifier::Int(n) => Self::Int(n),
            RawIdentifier::Text(text) => Self::parse(&text),
        }
    }
}

impl Identifier {
    /// Parse a raw identifier, coercing integer-looking text
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Int)
    }

    /// Convert a JSON value into an identifier
    ///
    /// Returns `None` for null, booleans, non-integral numbers and
    /// composite values.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) if !s.trim().is_empty() => Some(Self::parse(s)),
            _ => None,
        }
    }

    /// JSON form of the identifier
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(n) => Value::from(*n),
            Self::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Identifier {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// A record as seen by the search-select core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier
    pub id: Identifier,

    /// Named field values (heterogeneous scalars)
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create a record with no fields
    #[must_use]
    pub fn new(id: impl Into<Identifier>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field value (builder style)
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Build a record from a JSON object, taking the identifier from `id_field`
    ///
    /// Returns `None` when the value is not an object or carries no usable
    /// identifier.
    #[must_use]
    pub fn from_object(object: Map<String, Value>, id_field: &str) -> Option<Self> {
        let id = object.get(id_field).and_then(Identifier::from_value)?;
        let fields = object
            .into_iter()
            .filter(|(name, _)| name != id_field)
            .collect();
        Some(Self { id, fields })
    }

    /// Look up a field value
    ///
    /// `id` resolves to the identifier unless the record carries an explicit
    /// field of that name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<Cow<'_, Value>> {
        match self.fields.get(name) {
            Some(value) => Some(Cow::Borrowed(value)),
            None if name == ID_FIELD => Some(Cow::Owned(self.id.to_value())),
            None => None,
        }
    }

    /// Field value coerced to text; absent fields read as empty
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        self.value(name)
            .map(|value| value_to_text(&value))
            .unwrap_or_default()
    }
}

/// Coerce a scalar to its display text
///
/// Null becomes empty, strings are taken verbatim, numbers and booleans use
/// their display form and composite values fall back to compact JSON.
#[must_use]
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_parse_coerces_integers() {
        assert_eq!(Identifier::parse("42"), Identifier::Int(42));
        assert_eq!(Identifier::parse(" 7 "), Identifier::Int(7));
        assert_eq!(
            Identifier::parse("abc-1"),
            Identifier::Text("abc-1".to_string())
        );
        assert_eq!(Identifier::from("3"), Identifier::from(3));
    }

    #[test]
    fn test_identifier_from_value() {
        assert_eq!(Identifier::from_value(&json!(5)), Some(Identifier::Int(5)));
        assert_eq!(Identifier::from_value(&json!("5")), Some(Identifier::Int(5)));
        assert_eq!(Identifier::from_value(&json!(1.5)), None);
        assert_eq!(Identifier::from_value(&json!(null)), None);
        assert_eq!(Identifier::from_value(&json!("")), None);
    }

    #[test]
    fn test_identifier_display_and_serde() {
        assert_eq!(Identifier::Int(9).to_string(), "9");
        assert_eq!(Identifier::Text("x".into()).to_string(), "x");

        let ids: Vec<Identifier> = serde_json::from_str(r#"[1, "two", "3"]"#).unwrap();
        assert_eq!(
            ids,
            vec![Identifier::Int(1), Identifier::Text("two".into()), Identifier::Int(3)]
        );
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[1,"two",3]"#);
    }

    #[test]
    fn test_record_value_lookup() {
        let record = Record::new(1).with_field("name", "Anna").with_field("age", 30);

        assert_eq!(record.text("name"), "Anna");
        assert_eq!(record.text("age"), "30");
        assert_eq!(record.text("missing"), "");
        assert_eq!(record.text("id"), "1");
    }

    #[test]
    fn test_record_from_object() {
        let object = json!({"id": "12", "email": "a@b.c"});
        let Value::Object(map) = object else {
            panic!("expected object");
        };

        let record = Record::from_object(map, "id").unwrap();
        assert_eq!(record.id, Identifier::Int(12));
        assert_eq!(record.text("email"), "a@b.c");
        assert!(!record.fields.contains_key("id"));
    }

    #[test]
    fn test_record_from_object_without_id() {
        let Value::Object(map) = json!({"name": "x"}) else {
            panic!("expected object");
        };
        assert!(Record::from_object(map, "id").is_none());
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&json!(null)), "");
        assert_eq!(value_to_text(&json!(true)), "true");
        assert_eq!(value_to_text(&json!(2.5)), "2.5");
        assert_eq!(value_to_text(&json!(["a"])), r#"["a"]"#);
    }
}
