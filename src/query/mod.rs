//! Candidate query descriptors
//!
//! The controller never talks to a store directly. Each search produces a
//! [`QueryDescriptor`], a plain value describing the predicates, exclusions,
//! ordering and cap a data source must apply. Descriptors can be evaluated
//! in memory ([`QueryDescriptor::matches`]) or rendered into parameterized
//! SQL ([`sql::render`]).
//!
//! # Architecture
//!
//! - `builder`: turns a search term plus settings into a descriptor
//! - `sql`: descriptor → SQL text with bound parameters
//! - `error`: field-name validation failures

pub mod builder;
pub mod error;
pub mod sql;

pub use builder::{CandidateQueryBuilder, validate_field_name};
pub use error::QueryError;

use crate::record::{Identifier, Record, value_to_text};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction for candidate ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SortDirection {
    /// Ascending (default)
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortDirection {
    /// Parse leniently: only a case-insensitive `"desc"` means descending
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    /// SQL keyword
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl From<String> for SortDirection {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering applied to candidate pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBy {
    /// Field to sort on
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl OrderBy {
    /// Create an ordering
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

impl Default for OrderBy {
    fn default() -> Self {
        Self::new(crate::record::ID_FIELD, SortDirection::Asc)
    }
}

/// What triggered a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// User typed a non-empty term
    Typed,
    /// Starter list shown on focus before typing, no term filter
    InitialLoad,
}

/// Term predicate over one or more fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    /// Match the term against all fields joined with `separator`
    Concatenated {
        fields: Vec<String>,
        separator: String,
    },
    /// Match the term against each field, OR-ed together
    AnyField { fields: Vec<String> },
}

impl SearchFilter {
    /// Fields referenced by the predicate
    #[must_use]
    pub fn fields(&self) -> &[String] {
        match self {
            Self::Concatenated { fields, .. } | Self::AnyField { fields } => fields,
        }
    }

    /// Case-insensitive substring match of `term` against `record`
    #[must_use]
    pub fn matches(&self, record: &Record, term: &str) -> bool {
        let needle = term.to_lowercase();
        match self {
            Self::Concatenated { fields, separator } => {
                // Null and absent fields are skipped; blank and padded values
                // are joined untrimmed
                let haystack = fields
                    .iter()
                    .filter_map(|field| record.value(field))
                    .filter(|value| !value.is_null())
                    .map(|value| value_to_text(&value))
                    .collect::<Vec<_>>()
                    .join(separator);
                haystack.to_lowercase().contains(&needle)
            }
            Self::AnyField { fields } => fields
                .iter()
                .map(|field| record.text(field).to_lowercase().contains(&needle))
                .fold(false, |any, hit| any | hit),
        }
    }
}

/// Everything a data source needs to fetch one candidate page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    /// Trigger of this query
    pub kind: QueryKind,
    /// Trimmed search term (`None` for initial loads)
    pub term: Option<String>,
    /// Term predicate (`None` for initial loads)
    pub filter: Option<SearchFilter>,
    /// Identifiers that must not appear in the page
    pub exclude_ids: Vec<Identifier>,
    /// Page ordering
    pub order_by: OrderBy,
    /// Maximum number of records
    pub limit: usize,
}

impl QueryDescriptor {
    /// Evaluate the term predicate and exclusions against a record
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        if self.exclude_ids.contains(&record.id) {
            return false;
        }

        match (&self.filter, &self.term) {
            (Some(filter), Some(term)) => filter.matches(record, term),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: i64, first: &str, last: &str) -> Record {
        Record::new(id)
            .with_field("first", first)
            .with_field("last", last)
    }

    fn descriptor(filter: SearchFilter, term: &str) -> QueryDescriptor {
        QueryDescriptor {
            kind: QueryKind::Typed,
            term: Some(term.to_string()),
            filter: Some(filter),
            exclude_ids: Vec::new(),
            order_by: OrderBy::default(),
            limit: 10,
        }
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Asc);
    }

    #[test]
    fn test_order_by_deserialize_lenient() {
        let order: OrderBy = serde_json::from_str(r#"{"direction": "Desc"}"#).unwrap();
        assert_eq!(order, OrderBy::new("id", SortDirection::Desc));

        let order: OrderBy = serde_json::from_str(r#"{"field": "name", "direction": "up"}"#).unwrap();
        assert_eq!(order, OrderBy::new("name", SortDirection::Asc));
    }

    #[test]
    fn test_any_field_matches_case_insensitive() {
        let filter = SearchFilter::AnyField {
            fields: vec!["first".into(), "last".into()],
        };
        let record = person(1, "Ada", "Lovelace");

        assert!(filter.matches(&record, "love"));
        assert!(filter.matches(&record, "ADA"));
        assert!(!filter.matches(&record, "ada love"));
    }

    #[test]
    fn test_concatenated_matches_across_fields() {
        let filter = SearchFilter::Concatenated {
            fields: vec!["first".into(), "last".into()],
            separator: " ".into(),
        };
        let record = person(1, "Ada", "Lovelace");

        assert!(filter.matches(&record, "ada love"));
        assert!(!filter.matches(&record, "adalove"));
    }

    #[test]
    fn test_concatenated_skips_absent_fields() {
        let filter = SearchFilter::Concatenated {
            fields: vec!["first".into(), "middle".into(), "last".into()],
            separator: " ".into(),
        };
        let record = person(1, "Ada", "Lovelace");
        assert!(filter.matches(&record, "ada lovelace"));
    }

    #[test]
    fn test_concatenated_keeps_values_untrimmed() {
        let filter = SearchFilter::Concatenated {
            fields: vec!["first".into(), "last".into()],
            separator: " ".into(),
        };
        let record = Record::new(1)
            .with_field("first", "Ada ")
            .with_field("last", "Lovelace");

        assert!(filter.matches(&record, "ada  lovelace"));
        assert!(!filter.matches(&record, "ada lovelace"));
    }

    #[test]
    fn test_descriptor_excludes_ids() {
        let mut query = descriptor(
            SearchFilter::AnyField {
                fields: vec!["first".into()],
            },
            "a",
        );
        query.exclude_ids = vec![Identifier::Int(1)];

        assert!(!query.matches(&person(1, "Ada", "Lovelace")));
        assert!(query.matches(&person(2, "Anna", "Smith")));
    }

    #[test]
    fn test_initial_load_matches_everything() {
        let query = QueryDescriptor {
            kind: QueryKind::InitialLoad,
            term: None,
            filter: None,
            exclude_ids: Vec::new(),
            order_by: OrderBy::default(),
            limit: 5,
        };
        assert!(query.matches(&person(3, "", "")));
    }
}
