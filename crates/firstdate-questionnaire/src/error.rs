use thiserror::Error;

use crate::steps::Step;
use crate::validation::StepErrors;

#[derive(Debug, Error)]
pub enum QuestionnaireError {
    #[error("unknown questionnaire field: {0}")]
    UnknownField(String),

    #[error("step {} has {} invalid field(s)", .0.step, .0.errors.len())]
    Validation(StepErrors),

    #[error("the questionnaire can only be submitted from step {last}, currently at step {0}", last = Step::LAST)]
    NotAtFinalStep(Step),

    #[error("cannot {action} while the submission is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },
}
