//! Configuration error types
//!
//! Configuration problems are fatal: a control with a bad configuration
//! never becomes usable.

use crate::query::QueryError;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `model_source` is blank
    #[error("Missing required option: model_source")]
    MissingModelSource,

    /// No data source was handed to the controller builder
    #[error("A data source is required")]
    MissingDataSource,

    /// A search or order field is not identifier-safe
    #[error("Invalid field configuration: {0}")]
    UnsafeField(#[from] QueryError),

    /// Configuration file or environment could not be loaded
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Configuration could not be rendered as TOML
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
