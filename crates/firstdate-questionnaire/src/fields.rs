//! Every questionnaire field in display order: profile fields first, then
//! the Likert catalog.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use firstdate_core::choice::Choice;
use firstdate_core::document::field;
use firstdate_core::models::preferences::{
    DateType, Identity, Interest, PartnerPreference, RelationshipType, YearOfStudy,
};

use crate::catalog::LIKERT_ITEMS;

/// A selectable option as shown to the respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

pub fn options_of<C: Choice>() -> Vec<ChoiceOption> {
    C::ALL
        .iter()
        .map(|c| ChoiceOption {
            value: c.value().to_string(),
            label: c.label().to_string(),
        })
        .collect()
}

/// How a field is entered and checked.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Free text, exactly [`STUDENT_ID_DIGITS`] digits.
    StudentId,
    /// One of a closed option set.
    Choice(fn() -> Vec<ChoiceOption>),
    /// One of the configured event dates.
    EventDate,
    /// A rating on the Likert scale.
    Likert,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Document attribute name, also the form field name.
    pub key: &'static str,
    pub label: &'static str,
    pub description: Option<&'static str>,
    /// Shown when the field is left empty.
    pub required_message: &'static str,
    pub kind: FieldKind,
}

pub const STUDENT_ID_DIGITS: usize = 7;

pub const DATE_NOT_AVAILABLE: &str = "Please select one of the available dates";
pub const INVALID_OPTION: &str = "Please select a valid option";
pub const LIKERT_REQUIRED: &str = "Please select an answer";

const PROFILE_FIELDS: [FieldSpec; 8] = [
    FieldSpec {
        key: field::STUDENT_ID,
        label: "Student ID",
        description: None,
        required_message: "Student ID is required",
        kind: FieldKind::StudentId,
    },
    FieldSpec {
        key: field::IDENTITY,
        label: "I identify as...",
        description: None,
        required_message: "Identity is required",
        kind: FieldKind::Choice(options_of::<Identity>),
    },
    FieldSpec {
        key: field::PREFERRED_DATE,
        label: "Which day would you prefer the date to be on?",
        description: Some("Choose between our event dates"),
        required_message: DATE_NOT_AVAILABLE,
        kind: FieldKind::EventDate,
    },
    FieldSpec {
        key: field::YEAR_OF_STUDY,
        label: "Which year are you in?",
        description: None,
        required_message: "Year of study is required",
        kind: FieldKind::Choice(options_of::<YearOfStudy>),
    },
    FieldSpec {
        key: field::PARTNER_PREFERENCE,
        label: "I would like to go on a date with someone who is...",
        description: None,
        required_message: "Partner preference is required",
        kind: FieldKind::Choice(options_of::<PartnerPreference>),
    },
    FieldSpec {
        key: field::DATE_TYPE,
        label: "I want to go on a...",
        description: None,
        required_message: "Date type is required",
        kind: FieldKind::Choice(options_of::<DateType>),
    },
    FieldSpec {
        key: field::RELATIONSHIP_TYPE,
        label: "I want a...",
        description: None,
        required_message: "Relationship type is required",
        kind: FieldKind::Choice(options_of::<RelationshipType>),
    },
    FieldSpec {
        key: field::INTERESTED_IN,
        label: "I am interested in...",
        description: None,
        required_message: "Interest is required",
        kind: FieldKind::Choice(options_of::<Interest>),
    },
];

/// Number of profile fields on step 1; the rest of the profile is step 2.
pub const BASIC_FIELD_COUNT: usize = 4;

static ALL_FIELDS: LazyLock<Vec<FieldSpec>> = LazyLock::new(|| {
    PROFILE_FIELDS
        .iter()
        .copied()
        .chain(LIKERT_ITEMS.iter().map(|item| FieldSpec {
            key: item.id,
            label: item.prompt,
            description: None,
            required_message: LIKERT_REQUIRED,
            kind: FieldKind::Likert,
        }))
        .collect()
});

pub fn all_fields() -> &'static [FieldSpec] {
    &ALL_FIELDS
}

pub fn profile_field_count() -> usize {
    PROFILE_FIELDS.len()
}

pub fn find_field(key: &str) -> Option<&'static FieldSpec> {
    all_fields().iter().find(|f| f.key == key)
}
