//! In-memory record store

use super::DataSource;
use crate::query::{QueryDescriptor, SortDirection};
use crate::record::{Identifier, Record, value_to_text};
use serde_json::Value;
use std::cmp::Ordering;

/// Records held in memory, queried by evaluating descriptors directly
///
/// Ordering follows SQL conventions: null and absent values sort first in
/// ascending order, numbers compare numerically, everything else by text.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<Record>,
}

impl MemorySource {
    /// Create a store from records
    ///
    /// Later records with an already seen identifier are dropped.
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        let mut source = Self::default();
        for record in records {
            source.insert(record);
        }
        source
    }

    /// Add a record; returns `false` if the identifier already exists
    pub fn insert(&mut self, record: Record) -> bool {
        if self.records.iter().any(|existing| existing.id == record.id) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|value| !value.is_null());
    let b = b.filter(|value| !value.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => value_to_text(x).cmp(&value_to_text(y)),
    }
}

impl DataSource for MemorySource {
    fn find_by_id(&self, id: &Identifier) -> Option<Record> {
        self.records.iter().find(|record| &record.id == id).cloned()
    }

    fn query(&self, query: &QueryDescriptor) -> Vec<Record> {
        let mut page: Vec<&Record> = self
            .records
            .iter()
            .filter(|record| query.matches(record))
            .collect();

        let field = query.order_by.field.as_str();
        page.sort_by(|a, b| {
            let ordering = compare_values(a.value(field).as_deref(), b.value(field).as_deref());
            match query.order_by.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        page.into_iter().take(query.limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{CandidateQueryBuilder, OrderBy};

    fn people() -> MemorySource {
        MemorySource::new(vec![
            Record::new(1).with_field("name", "Anna").with_field("age", 31),
            Record::new(2).with_field("name", "Anthony").with_field("age", 9),
            Record::new(3).with_field("name", "Bob").with_field("age", 100),
            Record::new(4).with_field("name", "Diana"),
        ])
    }

    #[test]
    fn test_find_by_id() {
        let source = people();
        assert_eq!(
            source.find_by_id(&Identifier::Int(3)).map(|r| r.text("name")),
            Some("Bob".to_string())
        );
        assert!(source.find_by_id(&Identifier::Int(99)).is_none());
    }

    #[test]
    fn test_duplicate_ids_dropped() {
        let mut source = people();
        assert!(!source.insert(Record::new(1).with_field("name", "Other")));
        assert_eq!(source.len(), 4);
    }

    #[test]
    fn test_query_filters_and_orders() {
        let query = CandidateQueryBuilder::new(vec!["name".into()])
            .build("an", &[])
            .unwrap()
            .unwrap();

        let names: Vec<String> = people().query(&query).iter().map(|r| r.text("name")).collect();
        assert_eq!(names, vec!["Anna", "Anthony", "Diana"]);
    }

    #[test]
    fn test_query_numeric_order_desc() {
        let query = CandidateQueryBuilder::new(vec!["name".into()])
            .with_order_by(OrderBy::new("age", SortDirection::Desc))
            .build("a", &[])
            .unwrap()
            .unwrap();

        let ids: Vec<Identifier> = people().query(&query).into_iter().map(|r| r.id).collect();
        // Diana has no age and sorts last when descending
        assert_eq!(ids, vec![Identifier::Int(1), Identifier::Int(2), Identifier::Int(4)]);
    }

    #[test]
    fn test_query_respects_exclusions_and_limit() {
        let query = CandidateQueryBuilder::new(vec!["name".into()])
            .with_limit(1)
            .build("an", &[Identifier::Int(1)])
            .unwrap()
            .unwrap();

        let ids: Vec<Identifier> = people().query(&query).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Identifier::Int(2)]);
    }
}
