//! Record source error types
//!
//! Only loading record files can fail. Lookups and queries against a
//! [`DataSource`](super::DataSource) never error: a miss is an empty result.

use thiserror::Error;

/// Errors while loading records into a memory source
#[derive(Debug, Error)]
pub enum SourceError {
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON record file
    #[error("Error while decoding JSON records: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed CSV record file
    #[error("Error while reading CSV records: {0}")]
    Csv(#[from] csv::Error),

    /// A record without a usable identifier
    #[error("Record {index} has no usable '{field}' value")]
    MissingId { index: usize, field: String },

    /// File extension not recognized
    #[error("Unsupported record file format: {0}")]
    UnsupportedFormat(String),

    /// Structurally wrong input (e.g. JSON that is not a list of objects)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
