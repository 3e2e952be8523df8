use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::choice::Choice;
use crate::document::{self, Document, field};
use crate::error::CoreError;

use super::preferences::{
    DateType, Identity, Interest, PartnerPreference, RelationshipType, YearOfStudy,
};

/// Version written by this client. Older documents are migrated at read time.
pub const CURRENT_SCHEMA_VERSION: u64 = 2;

/// One rated Likert statement, keyed by its catalog id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LikertAnswer {
    pub item_id: String,
    pub value: u8,
}

/// A fully validated questionnaire, ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionnaireAnswers {
    pub student_id: String,
    pub identity: Identity,
    pub preferred_date: Date,
    pub year_of_study: YearOfStudy,
    pub partner_preference: PartnerPreference,
    pub date_type: DateType,
    pub relationship_type: RelationshipType,
    pub interested_in: Interest,
    /// In catalog order.
    pub likert: Vec<LikertAnswer>,
}

/// A stored submission: the answers plus ownership and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionnaireSubmission {
    pub id: String,
    pub user_id: String,
    pub submitted_at: Timestamp,
    pub answers: QuestionnaireAnswers,
}

impl QuestionnaireSubmission {
    pub fn new(user_id: impl Into<String>, answers: QuestionnaireAnswers, submitted_at: Timestamp) -> Self {
        Self {
            id: document::new_document_id(),
            user_id: user_id.into(),
            submitted_at,
            answers,
        }
    }

    /// Build the document payload. The id travels separately as the document
    /// id, so it is not part of the payload.
    pub fn to_document(&self) -> Document {
        let a = &self.answers;
        let mut doc = Document::new();
        doc.insert(field::STUDENT_ID.into(), Value::String(a.student_id.clone()));
        doc.insert(field::IDENTITY.into(), choice(a.identity));
        doc.insert(
            field::PREFERRED_DATE.into(),
            Value::String(a.preferred_date.to_string()),
        );
        doc.insert(field::YEAR_OF_STUDY.into(), choice(a.year_of_study));
        doc.insert(field::PARTNER_PREFERENCE.into(), choice(a.partner_preference));
        doc.insert(field::DATE_TYPE.into(), choice(a.date_type));
        doc.insert(field::RELATIONSHIP_TYPE.into(), choice(a.relationship_type));
        doc.insert(field::INTERESTED_IN.into(), choice(a.interested_in));
        for answer in &a.likert {
            doc.insert(answer.item_id.clone(), Value::from(answer.value));
        }
        doc.insert(field::USER_ID.into(), Value::String(self.user_id.clone()));
        doc.insert(
            field::SUBMITTED_AT.into(),
            Value::String(self.submitted_at.to_string()),
        );
        doc.insert(field::SCHEMA_VERSION.into(), Value::from(CURRENT_SCHEMA_VERSION));
        doc
    }

    /// Read back a current-version document. `likert_ids` selects which
    /// attributes are Likert answers, in catalog order; a missing one is an
    /// error.
    pub fn from_document(doc: &Document, likert_ids: &[&str]) -> Result<Self, CoreError> {
        let id = document::document_id(doc)
            .ok_or_else(|| CoreError::MissingField(document::DOCUMENT_ID.to_string()))?
            .to_string();

        let likert = likert_ids
            .iter()
            .map(|item_id| {
                let value = doc
                    .get(*item_id)
                    .and_then(Value::as_u64)
                    .and_then(|v| u8::try_from(v).ok())
                    .ok_or_else(|| CoreError::MissingField(item_id.to_string()))?;
                Ok(LikertAnswer {
                    item_id: item_id.to_string(),
                    value,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        let preferred_date: Date = required_str(doc, field::PREFERRED_DATE)?
            .parse()
            .map_err(|_| invalid(doc, field::PREFERRED_DATE))?;

        let answers = QuestionnaireAnswers {
            student_id: required_str(doc, field::STUDENT_ID)?.to_string(),
            identity: parse_choice(doc, field::IDENTITY)?,
            preferred_date,
            year_of_study: parse_choice(doc, field::YEAR_OF_STUDY)?,
            partner_preference: parse_choice(doc, field::PARTNER_PREFERENCE)?,
            date_type: parse_choice(doc, field::DATE_TYPE)?,
            relationship_type: parse_choice(doc, field::RELATIONSHIP_TYPE)?,
            interested_in: parse_choice(doc, field::INTERESTED_IN)?,
            likert,
        };

        Ok(Self {
            id,
            user_id: required_str(doc, field::USER_ID)?.to_string(),
            submitted_at: required_str(doc, field::SUBMITTED_AT)?.parse()?,
            answers,
        })
    }
}

fn choice<C: Choice>(c: C) -> Value {
    Value::String(c.value().to_string())
}

fn required_str<'a>(doc: &'a Document, name: &str) -> Result<&'a str, CoreError> {
    doc.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| CoreError::MissingField(name.to_string()))
}

fn parse_choice<C: Choice>(doc: &Document, name: &str) -> Result<C, CoreError> {
    C::parse(required_str(doc, name)?).ok_or_else(|| invalid(doc, name))
}

fn invalid(doc: &Document, name: &str) -> CoreError {
    CoreError::InvalidChoice {
        field: name.to_string(),
        value: doc.get(name).map(|v| v.to_string()).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn answers() -> QuestionnaireAnswers {
        QuestionnaireAnswers {
            student_id: "2101234".to_string(),
            identity: Identity::Female,
            preferred_date: date(2024, 11, 21),
            year_of_study: YearOfStudy::Second,
            partner_preference: PartnerPreference::Any,
            date_type: DateType::Coffee,
            relationship_type: RelationshipType::Serious,
            interested_in: Interest::Reading,
            likert: vec![
                LikertAnswer { item_id: "adventurous".to_string(), value: 4 },
                LikertAnswer { item_id: "romantic".to_string(), value: 2 },
            ],
        }
    }

    #[test]
    fn document_carries_owner_timestamp_and_version() {
        let at: Timestamp = "2024-11-01T12:00:00Z".parse().unwrap();
        let submission = QuestionnaireSubmission::new("user-1", answers(), at);
        let doc = submission.to_document();

        assert_eq!(doc[field::USER_ID], "user-1");
        assert_eq!(doc[field::SUBMITTED_AT], "2024-11-01T12:00:00Z");
        assert_eq!(doc[field::SCHEMA_VERSION], CURRENT_SCHEMA_VERSION);
        assert_eq!(doc[field::PREFERRED_DATE], "2024-11-21");
        assert_eq!(doc[field::YEAR_OF_STUDY], "2");
        assert_eq!(doc["adventurous"], 4);
        assert!(!doc.contains_key(document::DOCUMENT_ID));
    }

    #[test]
    fn likert_answers_follow_the_fixed_fields() {
        let at = Timestamp::UNIX_EPOCH;
        let doc = QuestionnaireSubmission::new("u", answers(), at).to_document();
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        let interested = keys.iter().position(|k| *k == field::INTERESTED_IN).unwrap();
        assert_eq!(keys[interested + 1], "adventurous");
        assert_eq!(keys[interested + 2], "romantic");
    }

    #[test]
    fn stored_document_reads_back() {
        let at: Timestamp = "2024-11-01T12:00:00Z".parse().unwrap();
        let submission = QuestionnaireSubmission::new("user-1", answers(), at);
        let mut doc = submission.to_document();
        doc.insert(document::DOCUMENT_ID.into(), Value::String(submission.id.clone()));

        let read = QuestionnaireSubmission::from_document(&doc, &["adventurous", "romantic"]).unwrap();
        assert_eq!(read, submission);
    }

    #[test]
    fn unknown_option_is_rejected_on_read() {
        let mut doc = QuestionnaireSubmission::new("u", answers(), Timestamp::UNIX_EPOCH).to_document();
        doc.insert(document::DOCUMENT_ID.into(), Value::String("abc".into()));
        doc.insert(field::IDENTITY.into(), Value::String("robot".into()));

        let err = QuestionnaireSubmission::from_document(&doc, &[]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidChoice { ref field, .. } if field == "identity"));
    }
}
