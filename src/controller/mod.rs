//! Search-select controller
//!
//! Orchestrates the search state, the selection set and the data source.
//! The host wires its input events to the `on_*` methods; the controller
//! owns all state and reports committed selection changes to a listener.
//!
//! ```
//! use search_select::config::SearchSelectConfig;
//! use search_select::controller::{EventLog, SearchSelect};
//! use search_select::record::Record;
//! use search_select::source::MemorySource;
//!
//! # fn main() -> Result<(), search_select::SearchSelectError> {
//! let source = MemorySource::new(vec![
//!     Record::new(1).with_field("name", "Anna"),
//!     Record::new(2).with_field("name", "Anthony"),
//! ]);
//! let config = SearchSelectConfig {
//!     label_fields: vec!["name".to_string()].into(),
//!     multiple: true,
//!     ..SearchSelectConfig::new("people")
//! };
//! let log = EventLog::new();
//!
//! let mut control = SearchSelect::builder()
//!     .config(config)
//!     .source(source)
//!     .listener(log.clone())
//!     .build()?;
//!
//! control.on_search_term_changed("an")?;
//! control.on_option_chosen(1)?;
//! assert_eq!(control.candidate_labels(), vec!["Anthony"]);
//! assert_eq!(log.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod state;

pub use events::{EventLog, SelectionEvent, SelectionListener};
pub use state::{PendingFetch, SearchState};

use crate::SearchSelectError;
use crate::config::{ConfigError, SearchSelectConfig, Settings};
use crate::query::QueryKind;
use crate::record::{Identifier, Record};
use crate::selection::{ChangeResult, SelectionMode, SelectionSet, SelectionValue};
use crate::source::DataSource;
use tracing::{debug, trace};

/// A search-select control instance
pub struct SearchSelect<S> {
    settings: Settings,
    source: S,
    selection: SelectionSet,
    search: SearchState,
    listener: Option<Box<dyn SelectionListener>>,
}

impl<S: DataSource> SearchSelect<S> {
    /// Create a new builder for constructing a `SearchSelect`
    #[must_use]
    pub fn builder() -> SearchSelectBuilder<S> {
        SearchSelectBuilder::new()
    }

    /// Validate `config` and create a control without a listener
    ///
    /// # Errors
    ///
    /// Returns `SearchSelectError::Config` if the configuration is invalid.
    pub fn new(config: &SearchSelectConfig, source: S) -> Result<Self, SearchSelectError> {
        Self::initialize(config.normalize()?, source, None)
    }

    /// Build the control from normalized settings, resolving preselected ids
    ///
    /// Each preselected id is looked up once; misses are stale ids and are
    /// dropped. In single mode the first hit wins and its label becomes the
    /// search text.
    fn initialize(
        settings: Settings,
        source: S,
        listener: Option<Box<dyn SelectionListener>>,
    ) -> Result<Self, SearchSelectError> {
        let mut selection = SelectionSet::new(settings.mode);

        for id in &settings.preselected {
            if settings.mode == SelectionMode::Single && !selection.is_empty() {
                debug!(%id, "ignoring extra preselected id in single mode");
                continue;
            }
            match source.find_by_id(id) {
                Some(record) => {
                    let label = settings.label.compose(&record);
                    selection.select(record.id, label);
                }
                None => debug!(%id, model = %settings.model_source, "dropping stale preselected id"),
            }
        }

        let search = match settings.mode {
            SelectionMode::Single => SearchState::with_term(selection.selected_label()),
            SelectionMode::Multi => SearchState::default(),
        };

        if listener.is_none() {
            debug!(model = %settings.model_source, "no selection listener registered; changes will not be emitted");
        }

        Ok(Self {
            settings,
            source,
            selection,
            search,
            listener,
        })
    }

    // ------------------------------------------------------------------
    // Host events
    // ------------------------------------------------------------------

    /// The input text changed
    ///
    /// A blank term clears the candidates; in single mode it also clears the
    /// selection, since the text field is authoritative there, and emits the
    /// empty value whether or not something was selected. Multi mode keeps
    /// its chips.
    ///
    /// # Errors
    ///
    /// Returns `SearchSelectError::Query` if the candidate query cannot be built.
    pub fn on_search_term_changed(&mut self, term: impl Into<String>) -> Result<(), SearchSelectError> {
        self.search.set_term(term);

        if self.search.is_blank() {
            self.search.clear_candidates();
            if self.mode() == SelectionMode::Single {
                let result = self.selection.clear_for_empty_search();
                self.emit(&result);
            }
            return Ok(());
        }

        self.fetch(QueryKind::Typed)
    }

    /// The input gained focus
    ///
    /// Shows the unfiltered starter list when the input is blank and initial
    /// loads are enabled.
    ///
    /// # Errors
    ///
    /// Returns `SearchSelectError::Query` if the candidate query cannot be built.
    pub fn on_focus_gained(&mut self) -> Result<(), SearchSelectError> {
        if self.search.is_blank() && self.settings.query.initial_limit() > 0 {
            self.fetch(QueryKind::InitialLoad)?;
        }
        Ok(())
    }

    /// A dropdown row was chosen
    ///
    /// The id is resolved through the data source; a miss (stale row, record
    /// deleted elsewhere) is ignored. Single mode commits the record, fills
    /// the input with its label and closes the candidate list. Multi mode
    /// toggles the record and refreshes the candidates without touching the
    /// input.
    ///
    /// # Errors
    ///
    /// Returns `SearchSelectError::Query` if the candidate refresh cannot be built.
    pub fn on_option_chosen(&mut self, id: impl Into<Identifier>) -> Result<(), SearchSelectError> {
        let id = id.into();
        let Some(record) = self.source.find_by_id(&id) else {
            debug!(%id, model = %self.settings.model_source, "chosen option not found");
            return Ok(());
        };
        let label = self.settings.label.compose(&record);

        match self.mode() {
            SelectionMode::Single => {
                let result = self.selection.select(record.id, label);
                self.search.set_term(self.selection.selected_label());
                self.search.clear_candidates();
                self.emit(&result);
            }
            SelectionMode::Multi => {
                let result = self.selection.toggle(record.id, label);
                self.refresh_candidates()?;
                self.emit(&result);
            }
        }
        Ok(())
    }

    /// A chip's remove control was activated (multi mode)
    ///
    /// Removing an id that is not selected is tolerated. Single mode has no
    /// chips and ignores the event.
    ///
    /// # Errors
    ///
    /// Returns `SearchSelectError::Query` if the candidate refresh cannot be built.
    pub fn on_chip_removed(&mut self, id: impl Into<Identifier>) -> Result<(), SearchSelectError> {
        if self.mode() == SelectionMode::Single {
            return Ok(());
        }

        let result = self.selection.remove(&id.into());
        self.refresh_candidates()?;
        self.emit(&result);
        Ok(())
    }

    /// Backspace was pressed while the input is blank (multi mode)
    ///
    /// Removes the most recently added chip. With text in the input the key
    /// edits the text instead and this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SearchSelectError::Query` if the candidate refresh cannot be built.
    pub fn on_backspace_at_empty_term(&mut self) -> Result<(), SearchSelectError> {
        if self.mode() == SelectionMode::Single || !self.search.is_blank() {
            return Ok(());
        }

        let result = self.selection.remove_last();
        self.refresh_candidates()?;
        self.emit(&result);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------

    /// Start a candidate fetch for the current term
    ///
    /// Returns `None` when there is nothing to query (blank typed term or
    /// initial loads disabled). Hosts that fetch asynchronously run
    /// `pending.query` themselves and hand the page to
    /// [`complete_fetch`](Self::complete_fetch).
    ///
    /// # Errors
    ///
    /// Returns `SearchSelectError::Query` if a field name is not identifier-safe.
    pub fn begin_fetch(&mut self, kind: QueryKind) -> Result<Option<PendingFetch>, SearchSelectError> {
        let exclusions = self.selection.exclusions();
        let query = match kind {
            QueryKind::Typed => self.settings.query.build(self.search.term(), exclusions)?,
            QueryKind::InitialLoad => self.settings.query.build_initial(exclusions)?,
        };

        Ok(query.map(|query| {
            trace!(?query, "candidate query");
            self.search.begin(query)
        }))
    }

    /// Apply a fetched page
    ///
    /// Returns `false` if the page is stale (the term changed or a newer
    /// fetch began) and was discarded. Selected records are filtered out in
    /// multi mode even if the source ignored the exclusion.
    pub fn complete_fetch(&mut self, pending: PendingFetch, records: Vec<Record>) -> bool {
        let records: Vec<Record> = records
            .into_iter()
            .filter(|record| !self.selection.exclusions().contains(&record.id))
            .collect();

        let applied = self.search.apply(&pending, records);
        if !applied {
            debug!(term = pending.term(), "discarding stale candidate page");
        }
        applied
    }

    fn fetch(&mut self, kind: QueryKind) -> Result<(), SearchSelectError> {
        match self.begin_fetch(kind)? {
            Some(pending) => {
                let records = self.source.query(&pending.query);
                self.complete_fetch(pending, records);
            }
            None => self.search.clear_candidates(),
        }
        Ok(())
    }

    /// Re-run the query behind the visible candidates
    ///
    /// A typed term re-runs the typed search; a blank term keeps a starter
    /// list open if one was showing, and shows nothing otherwise.
    fn refresh_candidates(&mut self) -> Result<(), SearchSelectError> {
        if !self.search.is_blank() {
            self.fetch(QueryKind::Typed)
        } else if self.search.candidates_kind() == Some(QueryKind::InitialLoad) {
            self.fetch(QueryKind::InitialLoad)
        } else {
            self.search.clear_candidates();
            Ok(())
        }
    }

    fn emit(&mut self, result: &ChangeResult) {
        if !result.changed {
            return;
        }

        let event = SelectionEvent {
            name: self.settings.event_name.clone(),
            value: result.value.clone(),
        };
        match self.listener.as_mut() {
            Some(listener) => listener.on_selection_changed(&event),
            None => trace!(name = %event.name, "selection changed without listener"),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Selection mode
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        self.settings.mode
    }

    /// Normalized settings
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Name attached to emitted notifications
    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.settings.event_name
    }

    /// Underlying data source
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Current input text
    #[must_use]
    pub fn term(&self) -> &str {
        self.search.term()
    }

    /// Current candidate page
    #[must_use]
    pub fn candidates(&self) -> &[Record] {
        self.search.candidates()
    }

    /// Labels of the current candidates, in page order
    #[must_use]
    pub fn candidate_labels(&self) -> Vec<String> {
        self.candidates()
            .iter()
            .map(|record| self.settings.label.compose(record))
            .collect()
    }

    /// Committed selection
    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Committed selection value as emitted to listeners
    #[must_use]
    pub fn value(&self) -> SelectionValue {
        self.selection.value()
    }
}

/// Builder for `SearchSelect`
pub struct SearchSelectBuilder<S> {
    config: Option<SearchSelectConfig>,
    source: Option<S>,
    listener: Option<Box<dyn SelectionListener>>,
}

impl<S: DataSource> SearchSelectBuilder<S> {
    /// Create a new builder with no configuration
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: None,
            source: None,
            listener: None,
        }
    }

    /// Set the control options (required)
    #[must_use]
    pub fn config(mut self, config: SearchSelectConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the data source (required)
    #[must_use]
    pub fn source(mut self, source: S) -> Self {
        self.source = Some(source);
        self
    }

    /// Register the selection listener
    #[must_use]
    pub fn listener(mut self, listener: impl SelectionListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Build the `SearchSelect`
    ///
    /// # Errors
    ///
    /// Returns `SearchSelectError::Config` if:
    /// - no configuration or data source was provided
    /// - `model_source` is blank
    /// - a search or order field is not identifier-safe
    pub fn build(self) -> Result<SearchSelect<S>, SearchSelectError> {
        let config = self.config.ok_or(ConfigError::MissingModelSource)?;
        let source = self.source.ok_or(ConfigError::MissingDataSource)?;
        SearchSelect::initialize(config.normalize()?, source, self.listener)
    }
}

impl<S: DataSource> Default for SearchSelectBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
