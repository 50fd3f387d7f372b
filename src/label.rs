//! Display labels composed from record fields

use crate::record::Record;

/// Compose a display label for a record
///
/// Each field is read in order, coerced to text and trimmed. Blank or
/// absent fields contribute nothing (no stray separator), the surviving
/// parts are joined with `separator` and `suffix` is appended as is.
///
/// # Examples
/// ```
/// use search_select::label::compose;
/// use search_select::record::Record;
///
/// let record = Record::new(1).with_field("first", "Ada");
/// let fields = vec!["first".to_string(), "last".to_string()];
/// assert_eq!(compose(&record, &fields, " ", ""), "Ada");
/// ```
#[must_use]
pub fn compose(record: &Record, fields: &[String], separator: &str, suffix: &str) -> String {
    let parts: Vec<String> = fields
        .iter()
        .map(|field| record.text(field).trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();

    let mut label = parts.join(separator);
    label.push_str(suffix);
    label
}

/// Label settings bundled for repeated composition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelComposer {
    fields: Vec<String>,
    separator: String,
    suffix: String,
}

impl LabelComposer {
    /// Create a composer joining `fields` with a single space
    #[must_use]
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            separator: " ".to_string(),
            suffix: String::new(),
        }
    }

    /// Set the separator placed between field values
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the suffix appended to every label
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Fields used for the label, in order
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Compose the label of `record`
    #[must_use]
    pub fn compose(&self, record: &Record) -> String {
        compose(record, &self.fields, &self.separator, &self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_compose_joins_fields() {
        let record = Record::new(1)
            .with_field("first", "Ada")
            .with_field("last", "Lovelace");

        assert_eq!(
            compose(&record, &fields(&["first", "last"]), " ", ""),
            "Ada Lovelace"
        );
    }

    #[test]
    fn test_compose_skips_missing_field() {
        let record = Record::new(1).with_field("first", "Ada");
        assert_eq!(compose(&record, &fields(&["first", "last"]), " ", ""), "Ada");
    }

    #[test]
    fn test_compose_skips_blank_and_trims() {
        let record = Record::new(1)
            .with_field("first", "  Ada ")
            .with_field("middle", "   ")
            .with_field("last", serde_json::Value::Null)
            .with_field("title", "Countess");

        assert_eq!(
            compose(&record, &fields(&["first", "middle", "last", "title"]), ", ", ""),
            "Ada, Countess"
        );
    }

    #[test]
    fn test_compose_appends_suffix_unconditionally() {
        let record = Record::new(1).with_field("name", "Anna");
        assert_eq!(compose(&record, &fields(&["name"]), " ", " (user)"), "Anna (user)");

        let empty = Record::new(2);
        assert_eq!(compose(&empty, &fields(&["name"]), " ", " (user)"), " (user)");
    }

    #[test]
    fn test_compose_coerces_numbers() {
        let record = Record::new(1).with_field("code", 42).with_field("name", "x");
        assert_eq!(compose(&record, &fields(&["code", "name"]), "-", ""), "42-x");
    }

    #[test]
    fn test_composer_settings() {
        let composer = LabelComposer::new(fields(&["first", "last"]))
            .with_separator(" / ")
            .with_suffix("!");
        let record = Record::new(1)
            .with_field("first", "Ada")
            .with_field("last", "Lovelace");

        assert_eq!(composer.compose(&record), "Ada / Lovelace!");
        assert_eq!(composer.fields(), ["first", "last"]);
    }
}
