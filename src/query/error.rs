//! Query building error types
//!
//! Raised before anything reaches a data source. An unsafe field name is a
//! configuration problem: it is surfaced to the caller, never swallowed.

use thiserror::Error;

/// Query construction errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Field name outside the identifier-safe character set
    #[error("Unsafe field name: {0:?}")]
    UnsafeFieldName(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
