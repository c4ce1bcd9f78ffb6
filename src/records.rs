//! Complaint records read from an exported document collection.
//!
//! Records are loaded from either a JSON array or JSON Lines. Every record
//! needs an `embedding` array; an optional `id` (or `_id`) may be a string,
//! a number or an extended-JSON object id (`{"$oid": "..."}`), and is always
//! exposed as a string. All other fields are kept as metadata, with any
//! nested object ids flattened to strings the same way.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::similarity::{Embedded, Ranked};

/// Errors that can occur when loading records.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid record JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid record on line {line}: {source}")]
    LineError {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// A stored complaint with its precomputed embedding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ComplaintRecord {
    #[serde(
        default,
        alias = "_id",
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    pub embedding: Vec<f32>,

    /// Every other field of the document.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ComplaintRecord {
    pub fn new(id: Option<String>, embedding: Vec<f32>) -> Self {
        Self {
            id,
            embedding,
            metadata: Map::new(),
        }
    }

    /// Adds a metadata field.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

impl Embedded for ComplaintRecord {
    fn embedding(&self) -> &[f32] {
        &self.embedding
    }
}

/// A ranked record as returned to callers: id, score and the stored
/// document, no vector.
///
/// The document sits under `record` so its own fields can never collide
/// with `id` or `score`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RecordMatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,

    pub score: f32,

    #[serde(rename = "record")]
    pub metadata: &'a Map<String, Value>,
}

impl<'a> From<Ranked<'a, ComplaintRecord>> for RecordMatch<'a> {
    fn from(ranked: Ranked<'a, ComplaintRecord>) -> Self {
        Self {
            id: ranked.record.id.as_deref(),
            score: ranked.score,
            metadata: &ranked.record.metadata,
        }
    }
}

/// Loads records from a JSON array or JSON Lines file.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<ComplaintRecord>, RecordError> {
    let content = fs::read_to_string(path.as_ref())?;
    let records = parse_records(&content)?;
    debug!(
        path = %path.as_ref().display(),
        count = records.len(),
        "loaded records"
    );
    Ok(records)
}

/// Parses records from a JSON array or JSON Lines text.
pub fn parse_records(content: &str) -> Result<Vec<ComplaintRecord>, RecordError> {
    let mut records: Vec<ComplaintRecord> = if content.trim_start().starts_with('[') {
        serde_json::from_str(content)?
    } else {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|source| RecordError::LineError {
                    line: i + 1,
                    source,
                })
            })
            .collect::<Result<_, _>>()?
    };

    for record in &mut records {
        for value in record.metadata.values_mut() {
            flatten_object_ids(value);
        }
    }
    Ok(records)
}

/// Replaces every `{"$oid": "..."}` inside `value` with its string.
fn flatten_object_ids(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            if let Some(oid) = object_id(obj) {
                *value = Value::String(oid);
                return;
            }
            for nested in obj.values_mut() {
                flatten_object_ids(nested);
            }
        }
        Value::Array(items) => {
            for item in items {
                flatten_object_ids(item);
            }
        }
        _ => {}
    }
}

fn object_id(obj: &Map<String, Value>) -> Option<String> {
    match (obj.len(), obj.get("$oid")) {
        (1, Some(Value::String(oid))) => Some(oid.clone()),
        _ => None,
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Object(obj)) => object_id(&obj)
            .map(Some)
            .ok_or_else(|| D::Error::custom("id object must be {\"$oid\": \"...\"}")),
        Some(other) => Err(D::Error::custom(format!("unsupported id: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::rank;
    use serde_json::json;

    #[test]
    fn test_parse_json_array() {
        let content = r#"[
            {"_id": {"$oid": "65a1f0c2e4b0a1b2c3d4e5f6"}, "embedding": [1.0, 0.0], "location": "Lagos"},
            {"id": 42, "embedding": [0.0, 1.0]},
            {"embedding": [0.5, 0.5], "content": "no id"}
        ]"#;

        let records = parse_records(content).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id.as_deref(), Some("65a1f0c2e4b0a1b2c3d4e5f6"));
        assert_eq!(records[0].metadata["location"], json!("Lagos"));
        assert_eq!(records[1].id.as_deref(), Some("42"));
        assert_eq!(records[2].id, None);
        assert_eq!(records[2].embedding, vec![0.5, 0.5]);
    }

    #[test]
    fn test_parse_json_lines() {
        let content = "{\"id\": \"a\", \"embedding\": [1, 2]}\n\n{\"id\": \"b\", \"embedding\": [3, 4]}\n";
        let records = parse_records(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id.as_deref(), Some("b"));
        assert_eq!(records[1].embedding, vec![3.0, 4.0]);
    }

    #[test]
    fn test_parse_reports_line() {
        let content = "{\"embedding\": [1]}\n{\"id\": \"missing vector\"}\n";
        let err = parse_records(content).unwrap_err();
        assert!(matches!(err, RecordError::LineError { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_bad_id() {
        let content = r#"[{"id": [1, 2], "embedding": [1.0]}]"#;
        assert!(matches!(parse_records(content), Err(RecordError::JsonError(_))));
    }

    #[test]
    fn test_record_match_omits_embedding() {
        let records = vec![
            ComplaintRecord::new(Some("r1".into()), vec![1.0, 0.0]).with_field("category", "housing"),
        ];
        let ranked = rank(&[1.0, 0.0], &records, 1).unwrap();
        let matches: Vec<RecordMatch> = ranked.into_iter().map(RecordMatch::from).collect();

        let value = serde_json::to_value(&matches).unwrap();
        assert_eq!(
            value,
            json!([{"id": "r1", "score": 1.0, "record": {"category": "housing"}}])
        );
    }

    #[test]
    fn test_nested_object_ids_become_strings() {
        let content = r#"{"_id": {"$oid": "aa"}, "embedding": [1.0], "post_id": {"$oid": "bb"}, "author": {"user_id": {"$oid": "cc"}, "name": "A"}, "refs": [{"$oid": "dd"}]}"#;
        let records = parse_records(content).unwrap();

        let metadata = &records[0].metadata;
        assert_eq!(records[0].id.as_deref(), Some("aa"));
        assert_eq!(metadata["post_id"], json!("bb"));
        assert_eq!(metadata["author"], json!({"user_id": "cc", "name": "A"}));
        assert_eq!(metadata["refs"], json!(["dd"]));
    }

    #[test]
    fn test_record_match_keeps_document_score() {
        let content = r#"[{"id": "aa", "embedding": [1.0], "score": 7}]"#;
        let records = parse_records(content).unwrap();
        let ranked = rank(&[1.0], &records, 1).unwrap();
        let matches: Vec<RecordMatch> = ranked.into_iter().map(RecordMatch::from).collect();

        let value = serde_json::to_value(&matches).unwrap();
        assert_eq!(value[0].as_object().unwrap().len(), 3);
        assert_eq!(value[0]["score"], json!(1.0));
        assert_eq!(value[0]["record"]["score"], json!(7));
    }

    #[test]
    fn test_load_records_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("complaints.jsonl");
        fs::write(&path, "{\"id\": \"x\", \"embedding\": [0.1, 0.2, 0.3]}\n").unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].embedding.len(), 3);
    }

    #[test]
    fn test_load_records_missing_file() {
        let result = load_records("/nonexistent/records.json");
        assert!(matches!(result, Err(RecordError::IoError(_))));
    }
}
