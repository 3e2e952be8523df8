//! Flattening stored responses into a table.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use firstdate_core::document::{self, field, Document};
use firstdate_questionnaire::schema::normalize_document;

/// Normalized responses laid out as columns and rows of display strings.
/// The first column is always `submittedAt`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResponseTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResponseTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Field names across all records in first-seen order, leaving out system
/// fields and the bookkeeping fields `userId`, `submittedAt` and
/// `schemaVersion`.
pub fn answer_columns(records: &[Document]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if document::is_system_field(key)
                || key == field::USER_ID
                || key == field::SUBMITTED_AT
                || key == field::SCHEMA_VERSION
                || columns.iter().any(|c| c == key)
            {
                continue;
            }
            columns.push(key.clone());
        }
    }
    columns
}

pub fn tabulate(records: &[Document]) -> ResponseTable {
    let records: Vec<Document> = records.iter().map(normalize_document).collect();
    let answers = answer_columns(&records);

    let rows = records
        .iter()
        .map(|record| {
            std::iter::once(field::SUBMITTED_AT)
                .chain(answers.iter().map(String::as_str))
                .map(|key| cell(record.get(key)))
                .collect()
        })
        .collect();

    let mut columns = Vec::with_capacity(answers.len() + 1);
    columns.push(field::SUBMITTED_AT.to_string());
    columns.extend(answers);

    ResponseTable { columns, rows }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
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
    fn union_keeps_first_seen_order_and_skips_bookkeeping() {
        let records = [
            doc(json!({"$id": "1", "b": 1, "userId": "u", "a": 2, "submittedAt": "t1", "schemaVersion": 2})),
            doc(json!({"$id": "2", "c": 3, "a": 4, "schemaVersion": 2})),
        ];
        assert_eq!(answer_columns(&records), ["b", "a", "c"]);
    }

    #[test]
    fn missing_fields_become_empty_cells() {
        let records = [
            doc(json!({"b": "x", "submittedAt": "t1", "schemaVersion": 2})),
            doc(json!({"c": true, "schemaVersion": 2})),
        ];
        let table = tabulate(&records);
        assert_eq!(table.columns, ["submittedAt", "b", "c"]);
        assert_eq!(table.rows[0], ["t1", "x", ""]);
        assert_eq!(table.rows[1], ["", "", "true"]);
    }

    #[test]
    fn legacy_records_are_normalized_first() {
        let records = [doc(json!({"$id": "1", "extrovert": "4", "createdAt": "t0"}))];
        let table = tabulate(&records);
        assert_eq!(table.columns, ["submittedAt", "extrovert"]);
        assert_eq!(table.rows[0], ["t0", "4"]);
    }
}
