//! The questionnaire wizard.
//!
//! Step navigation and the submission protocol live together because editing
//! and navigating are only allowed while no write is in flight:
//!
//! `Drafted` → `AwaitingConfirmation` → `ConfirmedPendingWrite` →
//! `Committed` | `Failed`
//!
//! A failed write keeps every entered value and the current step; the
//! respondent may confirm again or go back to editing.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use firstdate_core::models::submission::QuestionnaireAnswers;
use firstdate_core::validation::FieldError;

use crate::catalog::LIKERT_LABELS;
use crate::error::QuestionnaireError;
use crate::fields::{self, ChoiceOption, FieldKind, FieldSpec};
use crate::steps::Step;
use crate::validation::{self, FormValues, QuestionnaireSettings};

/// Where the respondent is sent after a successful submission.
pub const CONFIRMATION_PATH: &str = "/confirmation";

/// Why a write did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SubmitFailure {
    Unauthenticated,
    AlreadySubmitted,
    Backend,
}

impl SubmitFailure {
    pub fn message(self) -> &'static str {
        match self {
            SubmitFailure::Unauthenticated => "Please sign in to submit the questionnaire.",
            SubmitFailure::AlreadySubmitted => "You have already submitted the questionnaire.",
            SubmitFailure::Backend => "Something went wrong. Please try again later.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionPhase {
    Drafted,
    AwaitingConfirmation(QuestionnaireAnswers),
    ConfirmedPendingWrite(QuestionnaireAnswers),
    Committed { submission_id: String },
    Failed {
        answers: QuestionnaireAnswers,
        failure: SubmitFailure,
    },
}

impl SubmissionPhase {
    fn name(&self) -> &'static str {
        match self {
            SubmissionPhase::Drafted => "drafted",
            SubmissionPhase::AwaitingConfirmation(_) => "awaiting confirmation",
            SubmissionPhase::ConfirmedPendingWrite(_) => "being written",
            SubmissionPhase::Committed { .. } => "committed",
            SubmissionPhase::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Wizard {
    settings: QuestionnaireSettings,
    step: Step,
    values: FormValues,
    errors: Vec<FieldError>,
    phase: SubmissionPhase,
}

impl Wizard {
    pub fn new(settings: QuestionnaireSettings) -> Self {
        Self {
            settings,
            step: Step::FIRST,
            values: FormValues::new(),
            errors: Vec::new(),
            phase: SubmissionPhase::Drafted,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    /// Errors from the last `next` or `submit`, for the current step.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn settings(&self) -> &QuestionnaireSettings {
        &self.settings
    }

    /// Store a raw value for any known field, on any step.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> Result<(), QuestionnaireError> {
        self.begin_edit("edit answers")?;
        let spec = fields::find_field(key).ok_or_else(|| QuestionnaireError::UnknownField(key.to_string()))?;
        self.values.insert(spec.key, value.into());
        self.errors.retain(|e| e.field != spec.key);
        Ok(())
    }

    /// Validate the current step and advance when it passes. Returns whether
    /// the step changed.
    pub fn next(&mut self) -> Result<bool, QuestionnaireError> {
        self.begin_edit("change step")?;
        self.errors = validation::validate_step(self.step, &self.values, &self.settings);
        if !self.errors.is_empty() {
            tracing::debug!(step = %self.step, invalid = self.errors.len(), "step validation failed");
            return Ok(false);
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Go back one step without validating.
    pub fn previous(&mut self) -> Result<Step, QuestionnaireError> {
        self.begin_edit("change step")?;
        self.errors.clear();
        if let Some(prev) = self.step.previous() {
            self.step = prev;
        }
        Ok(self.step)
    }

    /// Validate the whole questionnaire from the final step. On failure,
    /// jump to the first failing step and show its errors; nothing is
    /// written. On success, wait for explicit confirmation.
    pub fn submit(&mut self) -> Result<(), QuestionnaireError> {
        if !self.step.is_last() {
            return Err(QuestionnaireError::NotAtFinalStep(self.step));
        }
        self.begin_edit("submit")?;

        match validation::parse_answers(&self.values, &self.settings) {
            Ok(answers) => {
                self.errors.clear();
                self.phase = SubmissionPhase::AwaitingConfirmation(answers);
                Ok(())
            }
            Err(failed) => {
                tracing::debug!(step = %failed.step, "submission blocked by validation");
                self.step = failed.step;
                self.errors = failed.errors.clone();
                Err(QuestionnaireError::Validation(failed))
            }
        }
    }

    /// Dismiss the confirmation prompt and return to editing.
    pub fn cancel_confirmation(&mut self) -> Result<(), QuestionnaireError> {
        match self.phase {
            SubmissionPhase::AwaitingConfirmation(_) | SubmissionPhase::Failed { .. } => {
                self.phase = SubmissionPhase::Drafted;
                Ok(())
            }
            _ => Err(self.invalid("cancel confirmation")),
        }
    }

    /// The respondent confirmed. Hands back the answers to write. Also used
    /// to retry after a failed write.
    pub fn confirm(&mut self) -> Result<QuestionnaireAnswers, QuestionnaireError> {
        let answers = match &self.phase {
            SubmissionPhase::AwaitingConfirmation(answers) | SubmissionPhase::Failed { answers, .. } => {
                answers.clone()
            }
            _ => return Err(self.invalid("confirm")),
        };
        self.phase = SubmissionPhase::ConfirmedPendingWrite(answers.clone());
        Ok(answers)
    }

    /// Record the outcome of the write started by [`confirm`](Self::confirm).
    pub fn record_outcome(&mut self, outcome: Result<String, SubmitFailure>) -> Result<(), QuestionnaireError> {
        let answers = match &self.phase {
            SubmissionPhase::ConfirmedPendingWrite(answers) => answers.clone(),
            _ => return Err(self.invalid("record a write outcome")),
        };
        self.phase = match outcome {
            Ok(submission_id) => SubmissionPhase::Committed { submission_id },
            Err(failure) => SubmissionPhase::Failed { answers, failure },
        };
        Ok(())
    }

    /// Editing is allowed while drafting; it also withdraws a pending
    /// confirmation or a failed attempt.
    fn begin_edit(&mut self, action: &'static str) -> Result<(), QuestionnaireError> {
        match self.phase {
            SubmissionPhase::Drafted => Ok(()),
            SubmissionPhase::AwaitingConfirmation(_) | SubmissionPhase::Failed { .. } => {
                self.phase = SubmissionPhase::Drafted;
                Ok(())
            }
            SubmissionPhase::ConfirmedPendingWrite(_) | SubmissionPhase::Committed { .. } => {
                Err(self.invalid(action))
            }
        }
    }

    fn invalid(&self, action: &'static str) -> QuestionnaireError {
        QuestionnaireError::InvalidTransition {
            action,
            phase: self.phase.name(),
        }
    }

    pub fn view(&self) -> WizardView {
        let fields = self
            .step
            .fields()
            .iter()
            .map(|spec| FieldView {
                key: spec.key.to_string(),
                label: spec.label.to_string(),
                description: spec.description.map(str::to_string),
                input: InputKind::of(spec),
                options: field_options(spec, &self.settings),
                value: self.value(spec.key).map(str::to_string),
                error: self
                    .errors
                    .iter()
                    .find(|e| e.field == spec.key)
                    .map(|e| e.message.clone()),
            })
            .collect();

        WizardView {
            step: self.step,
            total_steps: Step::COUNT,
            title: self.step.title(),
            progress_percent: self.step.progress_percent(),
            can_go_back: self.step.previous().is_some(),
            is_final_step: self.step.is_last(),
            fields,
            phase: PhaseView::of(&self.phase),
        }
    }
}

/// How the form should render a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InputKind {
    Text,
    Select,
    Radio,
}

impl InputKind {
    fn of(spec: &FieldSpec) -> Self {
        match spec.kind {
            FieldKind::StudentId => InputKind::Text,
            FieldKind::Choice(_) | FieldKind::EventDate => InputKind::Select,
            FieldKind::Likert => InputKind::Radio,
        }
    }
}

pub fn field_options(spec: &FieldSpec, settings: &QuestionnaireSettings) -> Vec<ChoiceOption> {
    match spec.kind {
        FieldKind::StudentId => Vec::new(),
        FieldKind::Choice(options) => options(),
        FieldKind::EventDate => settings
            .event_dates
            .iter()
            .map(|d| ChoiceOption {
                value: d.to_string(),
                label: event_date_label(*d),
            })
            .collect(),
        FieldKind::Likert => LIKERT_LABELS
            .iter()
            .map(|(value, label)| ChoiceOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect(),
    }
}

/// "Thursday, November 21st".
pub fn event_date_label(date: Date) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {day}{suffix}", date.strftime("%A, %B"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldView {
    pub key: String,
    pub label: String,
    pub description: Option<String>,
    pub input: InputKind,
    pub options: Vec<ChoiceOption>,
    pub value: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "state", rename_all = "snake_case")]
#[ts(export)]
pub enum PhaseView {
    Drafted,
    AwaitingConfirmation,
    Submitting,
    Committed { submission_id: String, redirect: String },
    Failed { failure: SubmitFailure, message: String },
}

impl PhaseView {
    fn of(phase: &SubmissionPhase) -> Self {
        match phase {
            SubmissionPhase::Drafted => PhaseView::Drafted,
            SubmissionPhase::AwaitingConfirmation(_) => PhaseView::AwaitingConfirmation,
            SubmissionPhase::ConfirmedPendingWrite(_) => PhaseView::Submitting,
            SubmissionPhase::Committed { submission_id } => PhaseView::Committed {
                submission_id: submission_id.clone(),
                redirect: CONFIRMATION_PATH.to_string(),
            },
            SubmissionPhase::Failed { failure, .. } => PhaseView::Failed {
                failure: *failure,
                message: failure.message().to_string(),
            },
        }
    }
}

/// Everything the form needs to render the current step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WizardView {
    pub step: Step,
    pub total_steps: u8,
    pub title: String,
    pub progress_percent: u8,
    pub can_go_back: bool,
    pub is_final_step: bool,
    pub fields: Vec<FieldView>,
    pub phase: PhaseView,
}
