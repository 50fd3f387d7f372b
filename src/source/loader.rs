//! Loading record files into a [`MemorySource`]
//!
//! Supported formats:
//! - JSON: a top-level array of objects
//! - CSV: a header row naming the fields, one record per row

use super::error::SourceError;
use super::memory::MemorySource;
use crate::record::{Record, value_to_text};
use serde_json::{Map, Value};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Load records, choosing the format from the file extension
///
/// # Errors
///
/// Returns `SourceError` if the file cannot be read or parsed, a record
/// lacks an identifier, or the extension is neither `json` nor `csv`.
pub fn load_records(path: &Path, id_field: &str) -> Result<MemorySource, SourceError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => load_json(fs::File::open(path)?, id_field),
        "csv" => load_csv(fs::File::open(path)?, id_field),
        other => Err(SourceError::UnsupportedFormat(other.to_string())),
    }
}

/// Load records from a JSON array of objects
///
/// # Errors
///
/// Returns `SourceError` on malformed JSON, non-object entries or entries
/// without an identifier.
pub fn load_json(reader: impl Read, id_field: &str) -> Result<MemorySource, SourceError> {
    let value: Value = serde_json::from_reader(reader)?;
    let Value::Array(entries) = value else {
        return Err(SourceError::InvalidInput(
            "expected a JSON array of records".to_string(),
        ));
    };

    let records = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(object) => {
                Record::from_object(object, id_field).ok_or_else(|| SourceError::MissingId {
                    index,
                    field: id_field.to_string(),
                })
            }
            _ => Err(SourceError::InvalidInput(format!(
                "record {index} is not a JSON object"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MemorySource::new(records))
}

/// Typed value of a CSV cell: empty → null, numbers → numbers, else text
///
/// A cell only becomes a number when the number prints back as the same
/// text, so `02134`, `+5` or `1e3` stay as written.
fn cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    let number = match cell.parse::<i64>() {
        Ok(n) => Some(Value::from(n)),
        Err(_) => cell
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::from),
    };
    number
        .filter(|value| value_to_text(value) == cell)
        .unwrap_or_else(|| Value::from(cell))
}

/// Load records from CSV with a header row
///
/// # Errors
///
/// Returns `SourceError` on malformed CSV or rows without an identifier.
pub fn load_csv(reader: impl Read, id_field: &str) -> Result<MemorySource, SourceError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut records = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row?;
        let object: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(name, cell)| (name.to_string(), cell_value(cell)))
            .collect();

        let record = Record::from_object(object, id_field).ok_or_else(|| SourceError::MissingId {
            index,
            field: id_field.to_string(),
        })?;
        records.push(record);
    }

    Ok(MemorySource::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Identifier;
    use crate::source::DataSource;
    use std::io::Write;

    #[test]
    fn test_load_json() {
        let json = r#"[{"id": 1, "name": "Anna"}, {"id": "2", "name": "Bob", "age": 4}]"#;
        let source = load_json(json.as_bytes(), "id").unwrap();

        assert_eq!(source.len(), 2);
        let bob = source.find_by_id(&Identifier::Int(2)).unwrap();
        assert_eq!(bob.text("age"), "4");
    }

    #[test]
    fn test_load_json_custom_id_field() {
        let json = r#"[{"uuid": "a-1", "name": "Anna"}]"#;
        let source = load_json(json.as_bytes(), "uuid").unwrap();
        assert!(source.find_by_id(&Identifier::Text("a-1".into())).is_some());
    }

    #[test]
    fn test_load_json_missing_id() {
        let json = r#"[{"id": 1}, {"name": "nobody"}]"#;
        let error = load_json(json.as_bytes(), "id").unwrap_err();
        assert!(matches!(error, SourceError::MissingId { index: 1, .. }));
    }

    #[test]
    fn test_load_json_not_array() {
        let error = load_json(r#"{"id": 1}"#.as_bytes(), "id").unwrap_err();
        assert!(matches!(error, SourceError::InvalidInput(_)));
    }

    #[test]
    fn test_load_csv() {
        let csv = "id,first,last,score\n1,Ada,Lovelace,9.5\n2,Alan,,7\n";
        let source = load_csv(csv.as_bytes(), "id").unwrap();

        assert_eq!(source.len(), 2);
        let alan = source.find_by_id(&Identifier::Int(2)).unwrap();
        assert_eq!(alan.value("last").as_deref(), Some(&Value::Null));
        assert_eq!(alan.value("score").as_deref(), Some(&Value::from(7)));
    }

    #[test]
    fn test_load_csv_keeps_number_like_text() {
        let csv = "id,name,zip,code,size\n1,Anna,02134,+5,1e3\n";
        let source = load_csv(csv.as_bytes(), "id").unwrap();

        let anna = source.find_by_id(&Identifier::Int(1)).unwrap();
        assert_eq!(anna.value("zip").as_deref(), Some(&Value::from("02134")));
        assert_eq!(anna.text("zip"), "02134");
        assert_eq!(anna.text("code"), "+5");
        assert_eq!(anna.text("size"), "1e3");
    }

    #[test]
    fn test_load_records_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "id,name\n5,Eve").unwrap();

        let source = load_records(&path, "id").unwrap();
        assert_eq!(source.len(), 1);

        let other = dir.path().join("people.xml");
        fs::write(&other, "<people/>").unwrap();
        assert!(matches!(
            load_records(&other, "id"),
            Err(SourceError::UnsupportedFormat(ext)) if ext == "xml"
        ));
    }
}
