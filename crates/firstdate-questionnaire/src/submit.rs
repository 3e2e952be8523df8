//! Writing a confirmed questionnaire to the document store.

use jiff::Timestamp;
use thiserror::Error;

use firstdate_core::document::{document_id, field, Document};
use firstdate_core::models::account::Account;
use firstdate_core::models::submission::{QuestionnaireAnswers, QuestionnaireSubmission};
use firstdate_storage::documents::{CollectionRef, DocumentStore, Query};
use firstdate_storage::error::StorageError;

use crate::error::QuestionnaireError;
use crate::wizard::{SubmitFailure, Wizard};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("sign in required to submit")]
    Unauthenticated,

    #[error("account {0} has already submitted the questionnaire")]
    AlreadySubmitted(String),

    #[error(transparent)]
    Wizard(#[from] QuestionnaireError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SubmitError {
    /// How the failure is presented to the respondent. `None` for wizard
    /// misuse, which is not a write failure.
    pub fn failure(&self) -> Option<SubmitFailure> {
        match self {
            SubmitError::Unauthenticated => Some(SubmitFailure::Unauthenticated),
            SubmitError::Storage(StorageError::Unauthorized(_)) => Some(SubmitFailure::Unauthenticated),
            SubmitError::AlreadySubmitted(_) => Some(SubmitFailure::AlreadySubmitted),
            SubmitError::Storage(_) => Some(SubmitFailure::Backend),
            SubmitError::Wizard(_) => None,
        }
    }
}

/// The account's stored submission, if any.
pub async fn find_submission<S: DocumentStore + ?Sized>(
    store: &S,
    collection: &CollectionRef,
    user_id: &str,
) -> Result<Option<Document>, StorageError> {
    let page = store
        .list_records(collection, &[Query::equal(field::USER_ID, user_id), Query::limit(1)])
        .await?;
    Ok(page.documents.into_iter().next())
}

/// Persist one submission for `account`. Issues exactly one create call, and
/// none at all when the account already has a submission.
pub async fn commit_submission<S: DocumentStore + ?Sized>(
    store: &S,
    collection: &CollectionRef,
    account: &Account,
    answers: QuestionnaireAnswers,
    now: Timestamp,
) -> Result<QuestionnaireSubmission, SubmitError> {
    if find_submission(store, collection, &account.id).await?.is_some() {
        return Err(SubmitError::AlreadySubmitted(account.id.clone()));
    }

    let mut submission = QuestionnaireSubmission::new(account.id.clone(), answers, now);
    let created = store
        .create_record(collection, &submission.id, submission.to_document())
        .await?;
    if let Some(id) = document_id(&created) {
        submission.id = id.to_string();
    }

    tracing::info!(
        submission_id = %submission.id,
        user_id = %account.id,
        "questionnaire submitted"
    );
    Ok(submission)
}

/// Confirm the wizard's pending answers and write them. The outcome is
/// recorded on the wizard either way, so a failure can be retried by calling
/// this again.
pub async fn submit_confirmed<S: DocumentStore + ?Sized>(
    wizard: &mut Wizard,
    store: &S,
    collection: &CollectionRef,
    account: Option<&Account>,
    now: Timestamp,
) -> Result<QuestionnaireSubmission, SubmitError> {
    let answers = wizard.confirm()?;

    let result = match account {
        Some(account) => commit_submission(store, collection, account, answers, now).await,
        None => Err(SubmitError::Unauthenticated),
    };

    match &result {
        Ok(submission) => wizard.record_outcome(Ok(submission.id.clone()))?,
        Err(err) => {
            tracing::warn!(error = %err, "questionnaire submission failed");
            let failure = err.failure().unwrap_or(SubmitFailure::Backend);
            wizard.record_outcome(Err(failure))?;
        }
    }
    result
}
