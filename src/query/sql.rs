//! Parameterized SQL rendering of query descriptors
//!
//! For hosts whose record store is a SQL database. All values travel as
//! bound parameters; only identifier-safe names are spliced into the text.
//! The output works on both MySQL and PostgreSQL (`CONCAT_WS`, backslash
//! as the default `LIKE` escape).

use super::builder::validate_field_name;
use super::error::QueryError;
use super::{QueryDescriptor, SearchFilter};
use crate::record::ID_FIELD;
use serde_json::Value;

/// SQL text plus its positional (`?`) parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub text: String,
    pub params: Vec<Value>,
}

/// Escape `LIKE` metacharacters so the term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Render a descriptor as a `SELECT` against `table`
///
/// # Errors
///
/// Returns `QueryError::UnsafeFieldName` if the table, a search field or
/// the order field is not identifier-safe.
pub fn render(table: &str, query: &QueryDescriptor) -> Result<SqlStatement, QueryError> {
    validate_field_name(table)?;
    validate_field_name(&query.order_by.field)?;

    let mut clauses = Vec::new();
    let mut params = Vec::new();

    if let (Some(filter), Some(term)) = (&query.filter, &query.term) {
        for field in filter.fields() {
            validate_field_name(field)?;
        }
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));

        match filter {
            SearchFilter::Concatenated { fields, separator } => {
                clauses.push(format!("LOWER(CONCAT_WS(?, {})) LIKE ?", fields.join(", ")));
                params.push(Value::from(separator.as_str()));
                params.push(Value::from(pattern));
            }
            SearchFilter::AnyField { fields } => {
                let ors: Vec<String> = fields
                    .iter()
                    .map(|field| format!("LOWER({field}) LIKE ?"))
                    .collect();
                clauses.push(format!("({})", ors.join(" OR ")));
                params.extend(fields.iter().map(|_| Value::from(pattern.as_str())));
            }
        }
    }

    if !query.exclude_ids.is_empty() {
        let placeholders = vec!["?"; query.exclude_ids.len()].join(", ");
        clauses.push(format!("{ID_FIELD} NOT IN ({placeholders})"));
        params.extend(query.exclude_ids.iter().map(crate::record::Identifier::to_value));
    }

    let mut text = format!("SELECT * FROM {table}");
    if !clauses.is_empty() {
        text.push_str(" WHERE ");
        text.push_str(&clauses.join(" AND "));
    }
    text.push_str(&format!(
        " ORDER BY {} {} LIMIT {}",
        query.order_by.field,
        query.order_by.direction.as_str().to_uppercase(),
        query.limit
    ));

    Ok(SqlStatement { text, params })
}
