//! firstdate-questionnaire
//!
//! The compatibility questionnaire: the Likert catalog, the six-step wizard,
//! field validation, the submission protocol, and read-time normalization of
//! stored submissions.

pub mod catalog;
pub mod error;
pub mod fields;
pub mod schema;
pub mod steps;
pub mod submit;
pub mod validation;
pub mod wizard;

pub use error::QuestionnaireError;
pub use steps::Step;
pub use validation::QuestionnaireSettings;
pub use wizard::Wizard;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::fields::ChoiceOption;

/// One step of the questionnaire as the form renders it, before any answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StepOutline {
    pub step: Step,
    pub title: String,
    pub fields: Vec<FieldOutline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldOutline {
    pub key: String,
    pub label: String,
    pub description: Option<String>,
    pub options: Vec<ChoiceOption>,
}

/// The full questionnaire layout.
pub fn outline(settings: &QuestionnaireSettings) -> Vec<StepOutline> {
    Step::all()
        .map(|step| StepOutline {
            step,
            title: step.title(),
            fields: step
                .fields()
                .iter()
                .map(|spec| FieldOutline {
                    key: spec.key.to_string(),
                    label: spec.label.to_string(),
                    description: spec.description.map(str::to_string),
                    options: wizard::field_options(spec, settings),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_covers_every_field_once() {
        let outline = outline(&QuestionnaireSettings::default());
        assert_eq!(outline.len(), usize::from(Step::COUNT));
        let count: usize = outline.iter().map(|s| s.fields.len()).sum();
        assert_eq!(count, fields::all_fields().len());
        assert_eq!(outline[0].fields[2].options.len(), 2);
    }
}
