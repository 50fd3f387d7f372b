//! Configuration for search-select controls
//!
//! [`SearchSelectConfig`] is the raw option surface as a host supplies it.
//! Inputs are coerced rather than rejected: a bare string where a list is
//! expected becomes a one-element list, out-of-range caps are clamped and
//! any sort direction other than `desc` means ascending. Only a missing
//! model source or an unsafe field name is fatal.
//!
//! Configuration can be read from a TOML file; `SEARCH_SELECT_*`
//! environment variables override file values.

pub mod error;

pub use error::ConfigError;

use crate::label::LabelComposer;
use crate::query::{CandidateQueryBuilder, OrderBy};
use crate::record::Identifier;
use crate::selection::SelectionMode;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default event name carried by selection notifications
pub const DEFAULT_EVENT_NAME: &str = "search-select.changed";

/// A single value or a list of values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Flatten into a list
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

impl<T> OneOrMany<T> {
    /// Whether no value is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Many(values) if values.is_empty())
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values)
    }
}

/// Raw control options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SearchSelectConfig {
    /// Name of the record collection (table, model, endpoint)
    pub model_source: String,

    /// Fields composing the display label, in order
    pub label_fields: OneOrMany<String>,

    /// Fields the term is matched against (defaults to the label fields)
    #[serde(skip_serializing_if = "OneOrMany::is_empty")]
    pub search_fields: OneOrMany<String>,

    /// Match the term against the joined search fields
    pub concatenate_fields: bool,

    /// Cap for typed searches (clamped to at least 1)
    pub limit: i64,

    /// Cap for the starter list shown on focus (0 disables it)
    pub initial_load: i64,

    /// Multi-select mode
    pub multiple: bool,

    /// Identifiers selected when the control is created
    #[serde(skip_serializing_if = "OneOrMany::is_empty")]
    pub preselected: OneOrMany<Identifier>,

    /// Separator between label parts
    pub label_separator: String,

    /// Text appended to every label
    pub label_suffix: String,

    /// Separator used when joining fields for a concatenated search
    pub search_separator: String,

    /// Name carried by selection notifications
    pub event_name: String,

    /// Candidate ordering
    pub order_by: OrderBy,
}

impl Default for SearchSelectConfig {
    fn default() -> Self {
        Self {
            model_source: String::new(),
            label_fields: OneOrMany::Many(vec!["email".to_string()]),
            search_fields: OneOrMany::default(),
            concatenate_fields: false,
            limit: 10,
            initial_load: 0,
            multiple: false,
            preselected: OneOrMany::default(),
            label_separator: " ".to_string(),
            label_suffix: String::new(),
            search_separator: " ".to_string(),
            event_name: DEFAULT_EVENT_NAME.to_string(),
            order_by: OrderBy::default(),
        }
    }
}

/// Drop blank entries and surrounding whitespace from field lists
fn clean_fields(fields: OneOrMany<String>) -> Vec<String> {
    fields
        .into_vec()
        .into_iter()
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
        .collect()
}

impl SearchSelectConfig {
    /// Create a configuration for `model_source` with default options
    #[must_use]
    pub fn new(model_source: impl Into<String>) -> Self {
        Self {
            model_source: model_source.into(),
            ..Self::default()
        }
    }

    /// Default configuration file location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            config::ConfigError::Message("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("search-select").join("config.toml"))
    }

    /// Load configuration from a TOML file plus environment overrides
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be parsed or a value has
    /// the wrong shape.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("SEARCH_SELECT").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not valid TOML for this surface.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Render as pretty TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate and normalize into the settings a controller runs with
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingModelSource` when `model_source` is
    /// blank and `ConfigError::UnsafeField` when a search or order field
    /// is not identifier-safe.
    pub fn normalize(&self) -> Result<Settings, ConfigError> {
        let model_source = self.model_source.trim();
        if model_source.is_empty() {
            return Err(ConfigError::MissingModelSource);
        }

        let label_fields = clean_fields(self.label_fields.clone());
        let search_fields = match clean_fields(self.search_fields.clone()) {
            fields if fields.is_empty() => label_fields.clone(),
            fields => fields,
        };

        let limit = usize::try_from(self.limit.max(1)).unwrap_or(usize::MAX);
        let initial_load = usize::try_from(self.initial_load.max(0)).unwrap_or(0);

        let mut order_by = self.order_by.clone();
        if order_by.field.trim().is_empty() {
            order_by.field = OrderBy::default().field;
        }

        let query = CandidateQueryBuilder::new(search_fields)
            .with_concatenate(self.concatenate_fields)
            .with_separator(self.search_separator.clone())
            .with_order_by(order_by)
            .with_limit(limit)
            .with_initial_limit(initial_load);
        query.validate()?;

        let label = LabelComposer::new(label_fields)
            .with_separator(self.label_separator.clone())
            .with_suffix(self.label_suffix.clone());

        let mut preselected: Vec<Identifier> = Vec::new();
        for id in self.preselected.clone().into_vec() {
            let blank = matches!(&id, Identifier::Text(text) if text.trim().is_empty());
            if !blank && !preselected.contains(&id) {
                preselected.push(id);
            }
        }

        let event_name = match self.event_name.trim() {
            "" => DEFAULT_EVENT_NAME.to_string(),
            name => name.to_string(),
        };

        Ok(Settings {
            model_source: model_source.to_string(),
            mode: SelectionMode::from_multiple(self.multiple),
            label,
            query,
            preselected,
            event_name,
        })
    }
}

/// Validated, normalized control settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Name of the record collection
    pub model_source: String,
    /// Selection cardinality
    pub mode: SelectionMode,
    /// Label composition
    pub label: LabelComposer,
    /// Candidate query construction
    pub query: CandidateQueryBuilder,
    /// Unique identifiers to resolve at construction
    pub preselected: Vec<Identifier>,
    /// Notification name
    pub event_name: String,
}
