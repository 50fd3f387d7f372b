//! Query descriptor construction
//!
//! Pure: no store access. Two policies live here:
//! - a blank typed term yields no query at all (`Ok(None)`)
//! - every field name must be identifier-safe before it can reach a
//!   data source, since hosts may splice names into generated query text

use super::error::QueryError;
use super::{OrderBy, QueryDescriptor, QueryKind, SearchFilter};
use crate::record::Identifier;
use regex::Regex;
use std::sync::LazyLock;

static SAFE_FIELD_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.]+$").expect("field name pattern is a valid regex")
});

/// Check that a field name only uses `[A-Za-z0-9_.]`
///
/// # Errors
///
/// Returns `QueryError::UnsafeFieldName` for any other name, including the
/// empty string.
pub fn validate_field_name(name: &str) -> Result<(), QueryError> {
    if SAFE_FIELD_NAME.is_match(name) {
        Ok(())
    } else {
        Err(QueryError::UnsafeFieldName(name.to_string()))
    }
}

/// Builds candidate queries from search settings
///
/// Typed searches and initial loads have independent caps.
///
/// # Examples
/// ```
/// use search_select::query::CandidateQueryBuilder;
///
/// let builder = CandidateQueryBuilder::new(vec!["name".to_string()]).with_limit(5);
/// let query = builder.build("an", &[]).unwrap().unwrap();
/// assert_eq!(query.limit, 5);
/// assert!(builder.build("   ", &[]).unwrap().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQueryBuilder {
    search_fields: Vec<String>,
    concatenate: bool,
    separator: String,
    order_by: OrderBy,
    limit: usize,
    initial_limit: usize,
}

impl CandidateQueryBuilder {
    /// Create a builder searching `search_fields` with default settings
    #[must_use]
    pub fn new(search_fields: Vec<String>) -> Self {
        Self {
            search_fields,
            concatenate: false,
            separator: " ".to_string(),
            order_by: OrderBy::default(),
            limit: 10,
            initial_limit: 0,
        }
    }

    /// Match the term against the joined fields instead of each field
    #[must_use]
    pub const fn with_concatenate(mut self, concatenate: bool) -> Self {
        self.concatenate = concatenate;
        self
    }

    /// Separator used when joining fields for a concatenated search
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Ordering of candidate pages
    #[must_use]
    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    /// Cap for typed searches (at least 1)
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Cap for initial loads (0 disables them)
    #[must_use]
    pub const fn with_initial_limit(mut self, limit: usize) -> Self {
        self.initial_limit = limit;
        self
    }

    /// Fields the term is matched against
    #[must_use]
    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    /// Cap for initial loads
    #[must_use]
    pub const fn initial_limit(&self) -> usize {
        self.initial_limit
    }

    /// Validate every field name this builder can emit
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnsafeFieldName` for the first offending name.
    pub fn validate(&self) -> Result<(), QueryError> {
        self.search_fields
            .iter()
            .chain(std::iter::once(&self.order_by.field))
            .try_for_each(|field| validate_field_name(field))
    }

    /// Build the query for a typed term
    ///
    /// Returns `Ok(None)` when the trimmed term is empty.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnsafeFieldName` if a search or order field is
    /// not identifier-safe.
    pub fn build(
        &self,
        term: &str,
        exclude_ids: &[Identifier],
    ) -> Result<Option<QueryDescriptor>, QueryError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(None);
        }
        self.validate()?;

        let filter = if self.concatenate && self.search_fields.len() > 1 {
            SearchFilter::Concatenated {
                fields: self.search_fields.clone(),
                separator: self.separator.clone(),
            }
        } else {
            SearchFilter::AnyField {
                fields: self.search_fields.clone(),
            }
        };

        Ok(Some(QueryDescriptor {
            kind: QueryKind::Typed,
            term: Some(term.to_string()),
            filter: Some(filter),
            exclude_ids: exclude_ids.to_vec(),
            order_by: self.order_by.clone(),
            limit: self.limit,
        }))
    }

    /// Build the unfiltered starter query shown before typing
    ///
    /// Returns `Ok(None)` when initial loads are disabled.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnsafeFieldName` if the order field is not
    /// identifier-safe.
    pub fn build_initial(
        &self,
        exclude_ids: &[Identifier],
    ) -> Result<Option<QueryDescriptor>, QueryError> {
        if self.initial_limit == 0 {
            return Ok(None);
        }
        validate_field_name(&self.order_by.field)?;

        Ok(Some(QueryDescriptor {
            kind: QueryKind::InitialLoad,
            term: None,
            filter: None,
            exclude_ids: exclude_ids.to_vec(),
            order_by: self.order_by.clone(),
            limit: self.initial_limit,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortDirection;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_validate_field_name() {
        assert!(validate_field_name("email").is_ok());
        assert!(validate_field_name("users.first_name").is_ok());
        assert!(validate_field_name("Field9").is_ok());
        assert!(validate_field_name("").is_err());
        assert!(validate_field_name("first name").is_err());
        assert!(validate_field_name("name`").is_err());
    }

    #[test]
    fn test_rejects_injection_field_name() {
        let builder = CandidateQueryBuilder::new(fields(&["name", "id); DROP TABLE x"]))
            .with_concatenate(true);

        assert_eq!(
            builder.build("a", &[]),
            Err(QueryError::UnsafeFieldName("id); DROP TABLE x".to_string()))
        );
    }

    #[test]
    fn test_blank_term_is_no_query() {
        let builder = CandidateQueryBuilder::new(fields(&["name"]));
        assert_eq!(builder.build("", &[]), Ok(None));
        assert_eq!(builder.build(" \t ", &[]), Ok(None));
    }

    #[test]
    fn test_blank_term_skips_validation() {
        let builder = CandidateQueryBuilder::new(fields(&["bad name"]));
        assert_eq!(builder.build("", &[]), Ok(None));
    }

    #[test]
    fn test_concatenated_filter_needs_multiple_fields() {
        let single = CandidateQueryBuilder::new(fields(&["name"])).with_concatenate(true);
        let query = single.build("an", &[]).unwrap().unwrap();
        assert_eq!(
            query.filter,
            Some(SearchFilter::AnyField {
                fields: fields(&["name"])
            })
        );

        let multi = CandidateQueryBuilder::new(fields(&["first", "last"]))
            .with_concatenate(true)
            .with_separator("|");
        let query = multi.build("an", &[]).unwrap().unwrap();
        assert_eq!(
            query.filter,
            Some(SearchFilter::Concatenated {
                fields: fields(&["first", "last"]),
                separator: "|".to_string(),
            })
        );
    }

    #[test]
    fn test_typed_query_shape() {
        let builder = CandidateQueryBuilder::new(fields(&["first", "last"]))
            .with_order_by(OrderBy::new("last", SortDirection::Desc))
            .with_limit(0)
            .with_initial_limit(25);
        let exclude = vec![Identifier::Int(4)];

        let query = builder.build("  ann ", &exclude).unwrap().unwrap();

        assert_eq!(query.kind, QueryKind::Typed);
        assert_eq!(query.term.as_deref(), Some("ann"));
        assert_eq!(query.exclude_ids, exclude);
        assert_eq!(query.order_by, OrderBy::new("last", SortDirection::Desc));
        assert_eq!(query.limit, 1);
    }

    #[test]
    fn test_initial_query_uses_own_cap() {
        let builder = CandidateQueryBuilder::new(fields(&["name"]))
            .with_limit(10)
            .with_initial_limit(3);

        let query = builder.build_initial(&[]).unwrap().unwrap();
        assert_eq!(query.kind, QueryKind::InitialLoad);
        assert_eq!(query.limit, 3);
        assert!(query.term.is_none());
        assert!(query.filter.is_none());
    }

    #[test]
    fn test_initial_query_disabled() {
        let builder = CandidateQueryBuilder::new(fields(&["name"]));
        assert_eq!(builder.build_initial(&[]), Ok(None));
    }

    #[test]
    fn test_unsafe_order_field() {
        let builder = CandidateQueryBuilder::new(fields(&["name"]))
            .with_order_by(OrderBy::new("name desc, id", SortDirection::Asc))
            .with_initial_limit(5);

        assert!(builder.build("x", &[]).is_err());
        assert!(builder.build_initial(&[]).is_err());
    }
}
