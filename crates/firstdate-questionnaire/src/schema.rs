//! Read-time normalization of stored submissions.
//!
//! Documents are never rewritten in the backend. Anything read back is
//! migrated in memory, one version at a time, on the raw JSON object so
//! fields this crate does not know about pass through untouched.

use serde_json::Value;

use firstdate_core::document::{self, field, Document};
use firstdate_core::error::CoreError;
use firstdate_core::models::submission::{QuestionnaireSubmission, CURRENT_SCHEMA_VERSION};

use crate::catalog::{self, likert_ids};

/// Documents written before versioning carry no `schemaVersion`.
const UNVERSIONED: u64 = 1;

pub fn schema_version(doc: &Document) -> u64 {
    doc.get(field::SCHEMA_VERSION)
        .and_then(Value::as_u64)
        .unwrap_or(UNVERSIONED)
}

/// Bring a stored document up to the current schema version.
pub fn normalize_document(doc: &Document) -> Document {
    let mut doc = doc.clone();
    let mut version = schema_version(&doc);
    while version < CURRENT_SCHEMA_VERSION {
        doc = match version {
            1 => migrate_v1(doc),
            _ => break,
        };
        version += 1;
    }
    doc
}

/// Normalize and decode a stored submission.
pub fn read_submission(doc: &Document) -> Result<QuestionnaireSubmission, CoreError> {
    QuestionnaireSubmission::from_document(&normalize_document(doc), &likert_ids())
}

/// v1 → v2: alias names become canonical, `createdAt` becomes
/// `submittedAt`, Likert digit strings become integers.
///
/// The map is rebuilt rather than edited so renamed fields keep their
/// position.
fn migrate_v1(doc: Document) -> Document {
    let has_submitted_at = doc.contains_key(field::SUBMITTED_AT) || doc.contains_key(field::CREATED_AT);
    let fallback_timestamp = doc.get(document::DOCUMENT_CREATED_AT).cloned();
    let has_relationship = doc.contains_key(field::RELATIONSHIP_TYPE);
    let has_interest = doc.contains_key(field::INTERESTED_IN);

    let mut out = Document::new();
    for (key, value) in doc {
        let key = match key.as_str() {
            field::DATE_FORMAT if !has_relationship => field::RELATIONSHIP_TYPE.to_string(),
            field::YEAR_PREFERENCE if !has_interest => field::INTERESTED_IN.to_string(),
            field::CREATED_AT => field::SUBMITTED_AT.to_string(),
            _ => key,
        };
        let value = if catalog::is_likert_item(&key) {
            likert_value(value)
        } else {
            value
        };
        out.insert(key, value);
    }

    if !has_submitted_at {
        if let Some(ts) = fallback_timestamp {
            out.insert(field::SUBMITTED_AT.to_string(), ts);
        }
    }
    out.insert(field::SCHEMA_VERSION.to_string(), Value::from(CURRENT_SCHEMA_VERSION));
    out
}

fn likert_value(value: Value) -> Value {
    match value {
        Value::String(s) if s.trim().is_empty() => Value::Null,
        Value::String(s) => match s.trim().parse::<u64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(s),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn v1_document_is_migrated() {
        let legacy = doc(json!({
            "$id": "abc",
            "studentId": "1234567",
            "dateFormat": "serious",
            "yearPreference": "music",
            "extrovert": "4",
            "laidBack": "",
            "createdAt": "2024-11-01T10:00:00Z",
            "favouriteColour": "green",
        }));

        let normalized = normalize_document(&legacy);

        assert_eq!(normalized["relationshipType"], json!("serious"));
        assert_eq!(normalized["interestedIn"], json!("music"));
        assert_eq!(normalized["extrovert"], json!(4));
        assert_eq!(normalized["laidBack"], Value::Null);
        assert_eq!(normalized["submittedAt"], json!("2024-11-01T10:00:00Z"));
        assert_eq!(normalized["favouriteColour"], json!("green"));
        assert_eq!(normalized["schemaVersion"], json!(2));
        assert!(!normalized.contains_key("dateFormat"));
        assert!(!normalized.contains_key("createdAt"));

        let keys: Vec<&str> = normalized.keys().map(String::as_str).collect();
        assert_eq!(
            &keys[..6],
            ["$id", "studentId", "relationshipType", "interestedIn", "extrovert", "laidBack"]
        );
    }

    #[test]
    fn system_timestamp_fills_missing_submission_time() {
        let legacy = doc(json!({ "$id": "abc", "$createdAt": "2024-11-02T09:30:00.000+00:00" }));
        let normalized = normalize_document(&legacy);
        assert_eq!(normalized["submittedAt"], json!("2024-11-02T09:30:00.000+00:00"));
    }

    #[test]
    fn current_documents_are_unchanged() {
        let current = doc(json!({
            "studentId": "1234567",
            "extrovert": 3,
            "userId": "u1",
            "submittedAt": "2024-11-01T10:00:00Z",
            "schemaVersion": 2,
        }));
        assert_eq!(normalize_document(&current), current);
    }

    #[test]
    fn canonical_name_wins_over_alias() {
        let legacy = doc(json!({ "relationshipType": "casual", "dateFormat": "serious" }));
        let normalized = normalize_document(&legacy);
        assert_eq!(normalized["relationshipType"], json!("casual"));
        assert_eq!(normalized["dateFormat"], json!("serious"));
    }
}
