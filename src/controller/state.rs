//! Search state and in-flight fetch tracking
//!
//! Hosts that fetch asynchronously get last-writer-wins semantics: a page
//! is applied only if it belongs to the newest fetch and the term has not
//! changed since the fetch began.

use crate::query::{QueryDescriptor, QueryKind};
use crate::record::Record;

/// A fetch that has been started but not applied yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    generation: u64,
    term: String,
    /// Query the host must run
    pub query: QueryDescriptor,
}

impl PendingFetch {
    /// Term the fetch was started for
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }
}

/// Current input and candidate page
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    term: String,
    candidates: Vec<Record>,
    /// Kind of query that produced `candidates`
    candidates_kind: Option<QueryKind>,
    generation: u64,
}

impl SearchState {
    /// Create state with an initial term and no candidates
    #[must_use]
    pub fn with_term(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    /// Raw input text
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Whether the input is blank
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.term.trim().is_empty()
    }

    /// Replace the input text
    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    /// Last applied candidate page
    #[must_use]
    pub fn candidates(&self) -> &[Record] {
        &self.candidates
    }

    /// Kind of query behind the current candidates
    #[must_use]
    pub const fn candidates_kind(&self) -> Option<QueryKind> {
        self.candidates_kind
    }

    /// Drop candidates and invalidate any in-flight fetch
    pub fn clear_candidates(&mut self) {
        self.generation += 1;
        self.candidates.clear();
        self.candidates_kind = None;
    }

    /// Start a fetch for `query`, superseding earlier ones
    pub fn begin(&mut self, query: QueryDescriptor) -> PendingFetch {
        self.generation += 1;
        PendingFetch {
            generation: self.generation,
            term: self.term.clone(),
            query,
        }
    }

    /// Whether a fetch is still the newest one for the current term
    #[must_use]
    pub fn is_current(&self, pending: &PendingFetch) -> bool {
        pending.generation == self.generation && pending.term == self.term
    }

    /// Apply a page; returns `false` and discards it when stale
    pub fn apply(&mut self, pending: &PendingFetch, records: Vec<Record>) -> bool {
        if !self.is_current(pending) {
            return false;
        }
        self.candidates = records;
        self.candidates_kind = Some(pending.query.kind);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::CandidateQueryBuilder;

    fn query(term: &str) -> QueryDescriptor {
        CandidateQueryBuilder::new(vec!["name".into()])
            .build(term, &[])
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_apply_current_fetch() {
        let mut state = SearchState::with_term("an");
        let pending = state.begin(query("an"));

        assert!(state.apply(&pending, vec![Record::new(1)]));
        assert_eq!(state.candidates().len(), 1);
        assert_eq!(state.candidates_kind(), Some(QueryKind::Typed));
    }

    #[test]
    fn test_stale_term_is_discarded() {
        let mut state = SearchState::with_term("an");
        let pending = state.begin(query("an"));

        state.set_term("ann");
        assert!(!state.apply(&pending, vec![Record::new(1)]));
        assert!(state.candidates().is_empty());
    }

    #[test]
    fn test_superseded_fetch_is_discarded() {
        let mut state = SearchState::with_term("an");
        let first = state.begin(query("an"));
        let second = state.begin(query("an"));

        assert!(!state.apply(&first, vec![Record::new(1)]));
        assert!(state.apply(&second, vec![Record::new(2)]));
        assert_eq!(state.candidates()[0].id, crate::record::Identifier::Int(2));
    }

    #[test]
    fn test_clear_invalidates_pending() {
        let mut state = SearchState::with_term("an");
        let pending = state.begin(query("an"));

        state.clear_candidates();
        assert!(!state.apply(&pending, vec![Record::new(1)]));
    }
}
