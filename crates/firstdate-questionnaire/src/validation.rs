use std::collections::HashMap;
use std::sync::LazyLock;

use jiff::civil::{Date, date};
use regex::Regex;

use firstdate_core::choice::Choice;
use firstdate_core::document::field;
use firstdate_core::models::submission::{LikertAnswer, QuestionnaireAnswers};
use firstdate_core::validation::FieldError;

use crate::catalog::{LIKERT_ITEMS, LIKERT_SCALE};
use crate::fields::{DATE_NOT_AVAILABLE, FieldKind, FieldSpec, INVALID_OPTION, LIKERT_REQUIRED, STUDENT_ID_DIGITS};
use crate::steps::Step;

/// Raw form input, keyed by field name. Values are exactly what the form sent.
pub type FormValues = HashMap<&'static str, String>;

static STUDENT_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^[0-9]{{{STUDENT_ID_DIGITS}}}$")).expect("student id pattern is valid")
});

/// Event-specific settings that validation depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionnaireSettings {
    /// Dates respondents may pick, in display order.
    pub event_dates: Vec<Date>,
}

impl Default for QuestionnaireSettings {
    fn default() -> Self {
        Self {
            event_dates: vec![date(2024, 11, 21), date(2024, 11, 22)],
        }
    }
}

/// The invalid fields of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepErrors {
    pub step: Step,
    pub errors: Vec<FieldError>,
}

/// Check a single raw value against its field's rules.
pub fn check_field(
    spec: &FieldSpec,
    raw: Option<&str>,
    settings: &QuestionnaireSettings,
) -> Result<(), FieldError> {
    let value = raw.map(str::trim).unwrap_or_default();
    let fail = |message: &str| Err(FieldError::new(spec.key, message));

    if value.is_empty() {
        return fail(spec.required_message);
    }

    match spec.kind {
        FieldKind::StudentId => {
            if !STUDENT_ID_PATTERN.is_match(value) {
                return fail(format!("Student ID must be exactly {STUDENT_ID_DIGITS} digits").as_str());
            }
        }
        FieldKind::Choice(options) => {
            if !options().iter().any(|o| o.value == value) {
                return fail(INVALID_OPTION);
            }
        }
        FieldKind::EventDate => {
            if parse_event_date(value, settings).is_none() {
                return fail(DATE_NOT_AVAILABLE);
            }
        }
        FieldKind::Likert => {
            if parse_likert(value).is_none() {
                return fail(
                    format!(
                        "Answer must be between {} and {}",
                        LIKERT_SCALE.min, LIKERT_SCALE.max
                    )
                    .as_str(),
                );
            }
        }
    }
    Ok(())
}

/// Validate only the fields of `step`. Returns one error per invalid field,
/// in display order.
pub fn validate_step(step: Step, values: &FormValues, settings: &QuestionnaireSettings) -> Vec<FieldError> {
    step.fields()
        .iter()
        .filter_map(|spec| check_field(spec, values.get(spec.key).map(String::as_str), settings).err())
        .collect()
}

/// Validate every step in order and build the typed answers. Stops at the
/// first step with errors.
pub fn parse_answers(
    values: &FormValues,
    settings: &QuestionnaireSettings,
) -> Result<QuestionnaireAnswers, StepErrors> {
    for step in Step::all() {
        let errors = validate_step(step, values, settings);
        if !errors.is_empty() {
            return Err(StepErrors { step, errors });
        }
    }

    build_answers(values, settings).map_err(|e| StepErrors {
        step: Step::containing(&e.field).unwrap_or(Step::FIRST),
        errors: vec![e],
    })
}

fn build_answers(values: &FormValues, settings: &QuestionnaireSettings) -> Result<QuestionnaireAnswers, FieldError> {
    let raw = |key: &'static str| values.get(key).map(|v| v.trim()).unwrap_or_default();

    let likert = LIKERT_ITEMS
        .iter()
        .map(|item| {
            let value = parse_likert(raw(item.id))
                .ok_or_else(|| FieldError::new(item.id, LIKERT_REQUIRED))?;
            Ok(LikertAnswer {
                item_id: item.id.to_string(),
                value,
            })
        })
        .collect::<Result<Vec<_>, FieldError>>()?;

    Ok(QuestionnaireAnswers {
        student_id: raw(field::STUDENT_ID).to_string(),
        identity: choice(raw(field::IDENTITY), field::IDENTITY)?,
        preferred_date: parse_event_date(raw(field::PREFERRED_DATE), settings)
            .ok_or_else(|| FieldError::new(field::PREFERRED_DATE, DATE_NOT_AVAILABLE))?,
        year_of_study: choice(raw(field::YEAR_OF_STUDY), field::YEAR_OF_STUDY)?,
        partner_preference: choice(raw(field::PARTNER_PREFERENCE), field::PARTNER_PREFERENCE)?,
        date_type: choice(raw(field::DATE_TYPE), field::DATE_TYPE)?,
        relationship_type: choice(raw(field::RELATIONSHIP_TYPE), field::RELATIONSHIP_TYPE)?,
        interested_in: choice(raw(field::INTERESTED_IN), field::INTERESTED_IN)?,
        likert,
    })
}

fn choice<C: Choice>(value: &str, key: &str) -> Result<C, FieldError> {
    C::parse(value).ok_or_else(|| FieldError::new(key, INVALID_OPTION))
}

fn parse_event_date(value: &str, settings: &QuestionnaireSettings) -> Option<Date> {
    value
        .parse::<Date>()
        .ok()
        .filter(|d| settings.event_dates.contains(d))
}

/// Parse a Likert answer, accepting only whole numbers on the scale.
pub fn parse_likert(value: &str) -> Option<u8> {
    value.parse::<u8>().ok().filter(|v| LIKERT_SCALE.contains(*v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::find_field;

    fn settings() -> QuestionnaireSettings {
        QuestionnaireSettings::default()
    }

    fn check(key: &str, raw: &str) -> Result<(), String> {
        let spec = find_field(key).unwrap();
        check_field(spec, Some(raw), &settings()).map_err(|e| e.message)
    }

    #[test]
    fn student_id_needs_exactly_seven_digits() {
        assert_eq!(check(field::STUDENT_ID, ""), Err("Student ID is required".to_string()));
        assert_eq!(
            check(field::STUDENT_ID, "u123456"),
            Err("Student ID must be exactly 7 digits".to_string())
        );
        assert!(check(field::STUDENT_ID, "12345678").is_err());
        assert!(check(field::STUDENT_ID, " 2101234 ").is_ok());
    }

    #[test]
    fn choice_must_be_a_listed_option() {
        assert_eq!(check(field::IDENTITY, ""), Err("Identity is required".to_string()));
        assert_eq!(check(field::IDENTITY, "robot"), Err(INVALID_OPTION.to_string()));
        assert!(check(field::IDENTITY, "non-binary").is_ok());
    }

    #[test]
    fn preferred_date_must_be_an_event_date() {
        assert!(check(field::PREFERRED_DATE, "2024-11-21").is_ok());
        assert_eq!(
            check(field::PREFERRED_DATE, "2024-11-23"),
            Err(DATE_NOT_AVAILABLE.to_string())
        );
        assert!(check(field::PREFERRED_DATE, "next friday").is_err());
    }

    #[test]
    fn likert_answer_must_be_on_the_scale() {
        assert_eq!(check("romantic", ""), Err("Please select an answer".to_string()));
        assert_eq!(check("romantic", "0"), Err("Answer must be between 1 and 5".to_string()));
        assert!(check("romantic", "6").is_err());
        assert!(check("romantic", "3.5").is_err());
        assert!(check("romantic", "5").is_ok());
    }
}
