//! Testing utilities for search-select
//!
//! Record fixtures shared by unit tests.
//!
//! Only available when compiled with `cfg(test)`.

use crate::record::Record;
use crate::source::MemorySource;

/// Three records: Anna, Anthony and Bob
///
/// Typing `"an"` against `name` matches ids 1 and 2.
#[must_use]
pub fn scenario_source() -> MemorySource {
    MemorySource::new(vec![
        Record::new(1).with_field("name", "Anna"),
        Record::new(2).with_field("name", "Anthony"),
        Record::new(3).with_field("name", "Bob"),
    ])
}

/// Five people with `name`, `first`, `last` and `email` fields
///
/// Record 5 has no last name.
#[must_use]
pub fn people() -> MemorySource {
    MemorySource::new(vec![
        person(1, "Ada", Some("Lovelace")),
        person(2, "Alan", Some("Turing")),
        person(3, "Grace", Some("Hopper")),
        person(4, "Edsger", Some("Dijkstra")),
        person(5, "Barbara", None),
    ])
}

fn person(id: i64, first: &str, last: Option<&str>) -> Record {
    let name = match last {
        Some(last) => format!("{first} {last}"),
        None => first.to_string(),
    };
    let record = Record::new(id)
        .with_field("name", name)
        .with_field("first", first)
        .with_field("email", format!("{}@example.com", first.to_lowercase()));

    match last {
        Some(last) => record.with_field("last", last),
        None => record,
    }
}
