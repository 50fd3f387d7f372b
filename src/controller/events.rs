//! Selection notifications
//!
//! The control exports exactly one piece of state to its embedding context:
//! the committed selection. It is delivered synchronously to a listener
//! registered at construction.

use crate::selection::SelectionValue;
use std::cell::RefCell;
use std::rc::Rc;

/// Notification emitted when the committed selection changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    /// Configured event name
    pub name: String,
    /// Selection after the change
    pub value: SelectionValue,
}

/// Receiver of selection notifications
pub trait SelectionListener {
    /// Called once per committed selection change
    fn on_selection_changed(&mut self, event: &SelectionEvent);
}

impl<F: FnMut(&SelectionEvent)> SelectionListener for F {
    fn on_selection_changed(&mut self, event: &SelectionEvent) {
        self(event);
    }
}

/// Listener that keeps every event it receives
///
/// Clones share the same log, so one handle can be given to the controller
/// while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<SelectionEvent>>>,
}

impl EventLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of received events
    #[must_use]
    pub fn events(&self) -> Vec<SelectionEvent> {
        self.events.borrow().clone()
    }

    /// Number of received events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether no event was received
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Most recent event
    #[must_use]
    pub fn last(&self) -> Option<SelectionEvent> {
        self.events.borrow().last().cloned()
    }
}

impl SelectionListener for EventLog {
    fn on_selection_changed(&mut self, event: &SelectionEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
