//! Selection state
//!
//! The authoritative record of what the user has picked. Single mode holds
//! at most one identifier with its label; multi mode holds an ordered set
//! of unique identifiers, each with a label.
//!
//! # State machine
//!
//! Single: `Empty --select--> Chosen --select(new)--> Chosen`,
//! `Chosen --clear_for_empty_search--> Empty`.
//!
//! Multi: `Set(S) --select/toggle(add)--> Set(S ∪ {id})`,
//! `Set(S) --remove/toggle(remove)/remove_last--> Set(S \ {id})`.
//! `Set(∅)` is a valid resting state.

use crate::record::Identifier;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Selection cardinality, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// At most one record; the text field shows its label
    #[default]
    Single,
    /// Any number of records rendered as chips
    Multi,
}

impl SelectionMode {
    /// Mode from the `multiple` flag
    #[must_use]
    pub const fn from_multiple(multiple: bool) -> Self {
        if multiple { Self::Multi } else { Self::Single }
    }
}

/// Committed selection as exported to the embedding context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SelectionValue {
    /// Selected identifier, if any
    Single(Option<Identifier>),
    /// Selected identifiers in insertion order
    Multi(Vec<Identifier>),
}

impl SelectionValue {
    /// Payload form: `""` when nothing is selected in single mode, the
    /// identifier otherwise, or the list of identifiers in multi mode
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Single(None) => Value::from(""),
            Self::Single(Some(id)) => id.to_value(),
            Self::Multi(ids) => Value::Array(ids.iter().map(Identifier::to_value).collect()),
        }
    }
}

/// Outcome of a selection mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeResult {
    /// Whether the committed selection changed (and must be announced)
    pub changed: bool,
    /// Full selection after the operation
    pub value: SelectionValue,
}

/// The selection itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSet {
    Single {
        /// Selected identifier and its non-empty label
        selected: Option<(Identifier, String)>,
    },
    Multi {
        /// Unique identifiers in insertion order
        ids: Vec<Identifier>,
        /// Label per identifier; keys always equal `ids`
        labels: HashMap<Identifier, String>,
    },
}

/// Labels must be non-empty so the single-mode text field is never blank
/// while something is selected
fn non_empty_label(id: &Identifier, label: String) -> String {
    if label.is_empty() { id.to_string() } else { label }
}

impl SelectionSet {
    /// Create an empty selection
    #[must_use]
    pub fn new(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Self::Single { selected: None },
            SelectionMode::Multi => Self::Multi {
                ids: Vec::new(),
                labels: HashMap::new(),
            },
        }
    }

    /// Selection mode
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        match self {
            Self::Single { .. } => SelectionMode::Single,
            Self::Multi { .. } => SelectionMode::Multi,
        }
    }

    /// Current committed value
    #[must_use]
    pub fn value(&self) -> SelectionValue {
        match self {
            Self::Single { selected } => {
                SelectionValue::Single(selected.as_ref().map(|(id, _)| id.clone()))
            }
            Self::Multi { ids, .. } => SelectionValue::Multi(ids.clone()),
        }
    }

    fn result(&self, changed: bool) -> ChangeResult {
        ChangeResult {
            changed,
            value: self.value(),
        }
    }

    /// Select a record
    ///
    /// Single mode replaces the selection unconditionally and always counts
    /// as a change, even when re-selecting the same identifier. Multi mode
    /// appends an absent identifier and ignores a present one.
    pub fn select(&mut self, id: Identifier, label: String) -> ChangeResult {
        let label = non_empty_label(&id, label);
        let changed = match self {
            Self::Single { selected } => {
                *selected = Some((id, label));
                true
            }
            Self::Multi { ids, labels } => {
                if labels.contains_key(&id) {
                    false
                } else {
                    ids.push(id.clone());
                    labels.insert(id, label);
                    true
                }
            }
        };
        self.result(changed)
    }

    /// Remove the identifier if selected, select it otherwise
    ///
    /// Clicking an already selected dropdown row unselects it. Single mode
    /// has nothing to toggle and behaves as [`select`](Self::select).
    pub fn toggle(&mut self, id: Identifier, label: String) -> ChangeResult {
        match self {
            Self::Multi { labels, .. } if labels.contains_key(&id) => self.remove(&id),
            _ => self.select(id, label),
        }
    }

    /// Remove an identifier; absent identifiers are ignored
    pub fn remove(&mut self, id: &Identifier) -> ChangeResult {
        let changed = match self {
            Self::Single { selected } => {
                if selected.as_ref().is_some_and(|(current, _)| current == id) {
                    *selected = None;
                    true
                } else {
                    false
                }
            }
            Self::Multi { ids, labels } => {
                if labels.remove(id).is_some() {
                    ids.retain(|existing| existing != id);
                    true
                } else {
                    false
                }
            }
        };
        self.result(changed)
    }

    /// Remove the most recently added identifier; no-op when empty
    pub fn remove_last(&mut self) -> ChangeResult {
        let changed = match self {
            Self::Single { selected } => selected.take().is_some(),
            Self::Multi { ids, labels } => match ids.pop() {
                Some(id) => {
                    labels.remove(&id);
                    true
                }
                None => false,
            },
        };
        self.result(changed)
    }

    /// Clear a single-mode selection when the search text is emptied
    ///
    /// Single mode always reports a change, even when nothing was
    /// selected, so the host sees the empty value on every cleared input.
    /// Multi mode never auto-clears: emptying the text must not discard
    /// accumulated chips.
    pub fn clear_for_empty_search(&mut self) -> ChangeResult {
        let changed = match self {
            Self::Single { selected } => {
                *selected = None;
                true
            }
            Self::Multi { .. } => false,
        };
        self.result(changed)
    }

    /// Identifiers a candidate query must exclude
    ///
    /// Only multi mode excludes: a single-mode choice can still be re-picked.
    #[must_use]
    pub fn exclusions(&self) -> &[Identifier] {
        match self {
            Self::Single { .. } => &[],
            Self::Multi { ids, .. } => ids,
        }
    }

    /// Whether the identifier is selected
    #[must_use]
    pub fn contains(&self, id: &Identifier) -> bool {
        match self {
            Self::Single { selected } => selected.as_ref().is_some_and(|(current, _)| current == id),
            Self::Multi { labels, .. } => labels.contains_key(id),
        }
    }

    /// Number of selected identifiers
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single { selected } => usize::from(selected.is_some()),
            Self::Multi { ids, .. } => ids.len(),
        }
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selected identifier in single mode
    #[must_use]
    pub fn selected_id(&self) -> Option<&Identifier> {
        match self {
            Self::Single { selected } => selected.as_ref().map(|(id, _)| id),
            Self::Multi { .. } => None,
        }
    }

    /// Selected label in single mode, empty when nothing is selected
    #[must_use]
    pub fn selected_label(&self) -> &str {
        match self {
            Self::Single {
                selected: Some((_, label)),
            } => label,
            _ => "",
        }
    }

    /// Label of a selected identifier
    #[must_use]
    pub fn label(&self, id: &Identifier) -> Option<&str> {
        match self {
            Self::Single { selected } => selected
                .as_ref()
                .filter(|(current, _)| current == id)
                .map(|(_, label)| label.as_str()),
            Self::Multi { labels, .. } => labels.get(id).map(String::as_str),
        }
    }

    /// Selected identifiers with their labels, in insertion order
    #[must_use]
    pub fn entries(&self) -> Vec<(&Identifier, &str)> {
        match self {
            Self::Single { selected } => selected
                .iter()
                .map(|(id, label)| (id, label.as_str()))
                .collect(),
            Self::Multi { ids, labels } => ids
                .iter()
                .filter_map(|id| labels.get(id).map(|label| (id, label.as_str())))
                .collect(),
        }
    }
}
