//! search-select - selection and search state for incremental pickers
//!
//! This library implements the state machine behind a "search-select"
//! control: a text input that filters a remote record set and lets a user
//! pick one record (single mode) or several (multi mode). Rendering, event
//! wiring and the record store belong to the host.

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod controller;
pub mod label;
pub mod query;
pub mod record;
pub mod replay;
pub mod selection;
pub mod source;

#[cfg(test)]
pub mod testing;

pub use config::SearchSelectConfig;
pub use controller::{SearchSelect, SelectionEvent, SelectionListener};
pub use record::{Identifier, Record};
pub use selection::{SelectionMode, SelectionSet, SelectionValue};
pub use source::{DataSource, MemorySource};

/// Error enum, contains all failure states of the library
#[derive(Debug, Error)]
pub enum SearchSelectError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    /// Query building error
    #[error("Query error: {0}")]
    Query(#[from] query::QueryError),
    /// Record source error
    #[error("Source error: {0}")]
    Source(#[from] source::SourceError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
