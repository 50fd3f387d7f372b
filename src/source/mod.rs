//! Data source abstraction
//!
//! The record store belongs to the host. The controller reaches it only
//! through [`DataSource`]: identifier lookups and descriptor queries.
//!
//! # Architecture
//!
//! - `DataSource`: the collaborator trait implemented by the host
//! - `memory`: in-memory store evaluating descriptors (tests, CLI driver)
//! - `loader`: JSON/CSV record files → `MemorySource`

pub mod error;
pub mod loader;
pub mod memory;

pub use error::SourceError;
pub use loader::{load_csv, load_json, load_records};
pub use memory::MemorySource;

use crate::query::QueryDescriptor;
use crate::record::{Identifier, Record};
use std::rc::Rc;

/// Record store consulted by the controller
///
/// Implementations must never fail loudly: a lookup miss is `None` and a
/// failed query is an empty page. Retry and timeout policy belongs to the
/// implementation.
pub trait DataSource {
    /// Look up a single record
    fn find_by_id(&self, id: &Identifier) -> Option<Record>;

    /// Fetch one candidate page honoring predicates, exclusions, ordering
    /// and limit of `query`
    fn query(&self, query: &QueryDescriptor) -> Vec<Record>;
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn find_by_id(&self, id: &Identifier) -> Option<Record> {
        (**self).find_by_id(id)
    }

    fn query(&self, query: &QueryDescriptor) -> Vec<Record> {
        (**self).query(query)
    }
}

impl<T: DataSource + ?Sized> DataSource for Box<T> {
    fn find_by_id(&self, id: &Identifier) -> Option<Record> {
        (**self).find_by_id(id)
    }

    fn query(&self, query: &QueryDescriptor) -> Vec<Record> {
        (**self).query(query)
    }
}

impl<T: DataSource + ?Sized> DataSource for Rc<T> {
    fn find_by_id(&self, id: &Identifier) -> Option<Record> {
        (**self).find_by_id(id)
    }

    fn query(&self, query: &QueryDescriptor) -> Vec<Record> {
        (**self).query(query)
    }
}
