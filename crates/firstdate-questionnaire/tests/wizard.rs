use jiff::Timestamp;

use firstdate_core::models::account::Account;
use firstdate_questionnaire::catalog::LIKERT_ITEMS;
use firstdate_questionnaire::error::QuestionnaireError;
use firstdate_questionnaire::schema;
use firstdate_questionnaire::submit::{self, SubmitError};
use firstdate_questionnaire::wizard::{PhaseView, SubmissionPhase, SubmitFailure, CONFIRMATION_PATH};
use firstdate_questionnaire::{QuestionnaireSettings, Step, Wizard};
use firstdate_storage::documents::CollectionRef;
use firstdate_storage::error::StorageError;
use firstdate_storage::memory::MemoryStore;

fn collection() -> CollectionRef {
    CollectionRef::new("firstdate", "questionnaire")
}

fn account() -> Account {
    Account {
        id: "user-1".to_string(),
        name: "Test Student".to_string(),
        email: "student@warwick.ac.uk".to_string(),
        email_verified: true,
        labels: Vec::new(),
    }
}

fn now() -> Timestamp {
    "2024-11-10T12:00:00Z".parse().unwrap()
}

fn fill_profile(wizard: &mut Wizard) {
    for (key, value) in [
        ("studentId", "2101234"),
        ("identity", "female"),
        ("preferredDate", "2024-11-21"),
        ("yearOfStudy", "2"),
        ("partnerPreference", "any"),
        ("dateType", "coffee"),
        ("relationshipType", "serious"),
        ("interestedIn", "music"),
    ] {
        wizard.set_value(key, value).unwrap();
    }
}

fn fill_likert(wizard: &mut Wizard) {
    for item in LIKERT_ITEMS.iter() {
        wizard.set_value(item.id, "3").unwrap();
    }
}

fn walk_to_last(wizard: &mut Wizard) {
    while !wizard.step().is_last() {
        assert!(wizard.next().unwrap(), "stuck at step {}", wizard.step());
    }
}

#[test]
fn next_with_empty_fields_never_advances() {
    let mut wizard = Wizard::new(QuestionnaireSettings::default());
    for step in Step::all() {
        assert_eq!(wizard.step(), step);
        assert!(!wizard.next().unwrap());
        assert_eq!(wizard.step(), step);
        assert_eq!(wizard.errors().len(), step.fields().len());

        // Fill this step so the walk can continue.
        for spec in step.fields() {
            let value = match spec.key {
                "studentId" => "2101234",
                "identity" => "other",
                "preferredDate" => "2024-11-22",
                "yearOfStudy" => "postgraduate",
                "partnerPreference" => "male",
                "dateType" => "dinner",
                "relationshipType" => "casual",
                "interestedIn" => "food",
                _ => "5",
            };
            wizard.set_value(spec.key, value).unwrap();
        }
        wizard.next().unwrap();
    }
    assert_eq!(wizard.step(), Step::LAST);
}

#[test]
fn step_one_reports_field_messages() {
    let mut wizard = Wizard::new(QuestionnaireSettings::default());
    wizard.set_value("studentId", "12345").unwrap();
    wizard.set_value("preferredDate", "2024-12-25").unwrap();
    assert!(!wizard.next().unwrap());

    let view = wizard.view();
    let error = |key: &str| {
        view.fields
            .iter()
            .find(|f| f.key == key)
            .and_then(|f| f.error.clone())
    };
    assert_eq!(error("studentId").as_deref(), Some("Student ID must be exactly 7 digits"));
    assert_eq!(
        error("preferredDate").as_deref(),
        Some("Please select one of the available dates")
    );
    assert_eq!(error("identity").as_deref(), Some("Identity is required"));
    assert_eq!(error("yearOfStudy").as_deref(), Some("Year of study is required"));
}

#[test]
fn previous_floors_at_first_step() {
    let mut wizard = Wizard::new(QuestionnaireSettings::default());
    assert_eq!(wizard.previous().unwrap(), Step::FIRST);
    fill_profile(&mut wizard);
    wizard.next().unwrap();
    assert_eq!(wizard.step().number(), 2);
    assert_eq!(wizard.previous().unwrap(), Step::FIRST);
    assert_eq!(wizard.value("studentId"), Some("2101234"));
}

#[test]
fn unknown_fields_are_rejected() {
    let mut wizard = Wizard::new(QuestionnaireSettings::default());
    assert!(matches!(
        wizard.set_value("favouriteColour", "green"),
        Err(QuestionnaireError::UnknownField(_))
    ));
}

#[test]
fn submit_only_from_last_step() {
    let mut wizard = Wizard::new(QuestionnaireSettings::default());
    assert!(matches!(wizard.submit(), Err(QuestionnaireError::NotAtFinalStep(_))));
}

#[tokio::test]
async fn unanswered_likert_blocks_submission_without_writing() {
    let store = MemoryStore::new();
    let mut wizard = Wizard::new(QuestionnaireSettings::default());
    fill_profile(&mut wizard);
    fill_likert(&mut wizard);
    walk_to_last(&mut wizard);

    // Unanswer the first personality step from the last step.
    for spec in Step::new(3).unwrap().fields() {
        wizard.set_value(spec.key, "").unwrap();
    }

    let err = wizard.submit().unwrap_err();
    assert!(matches!(err, QuestionnaireError::Validation(ref e) if e.step.number() == 3));
    assert_eq!(wizard.step().number(), 3);
    assert_eq!(wizard.errors().len(), 7);
    assert!(wizard.errors().iter().all(|e| e.message == "Please select an answer"));
    assert_eq!(*wizard.phase(), SubmissionPhase::Drafted);

    assert!(matches!(
        submit::submit_confirmed(&mut wizard, &store, &collection(), Some(&account()), now()).await,
        Err(SubmitError::Wizard(QuestionnaireError::InvalidTransition { .. }))
    ));
    assert_eq!(store.create_calls(), 0);
}

#[tokio::test]
async fn full_flow_writes_exactly_one_record() {
    let store = MemoryStore::new();
    let mut wizard = Wizard::new(QuestionnaireSettings::default());
    fill_profile(&mut wizard);
    fill_likert(&mut wizard);
    walk_to_last(&mut wizard);

    wizard.submit().unwrap();
    assert_eq!(wizard.view().phase, PhaseView::AwaitingConfirmation);
    assert_eq!(store.create_calls(), 0);

    let submission = submit::submit_confirmed(&mut wizard, &store, &collection(), Some(&account()), now())
        .await
        .unwrap();
    assert_eq!(store.create_calls(), 1);
    assert_eq!(submission.user_id, "user-1");

    match wizard.view().phase {
        PhaseView::Committed { submission_id, redirect } => {
            assert_eq!(submission_id, submission.id);
            assert_eq!(redirect, CONFIRMATION_PATH);
        }
        other => panic!("expected committed, got {other:?}"),
    }

    let stored = store.documents(&collection());
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["userId"], "user-1");
    assert_eq!(stored[0]["schemaVersion"], 2);
    assert_eq!(stored[0]["extrovert"], 3);

    let read_back = schema::read_submission(&stored[0]).unwrap();
    assert_eq!(read_back.answers, submission.answers);

    // Editing after commit is refused.
    assert!(wizard.set_value("studentId", "7654321").is_err());
}

#[tokio::test]
async fn second_submission_is_a_conflict() {
    let store = MemoryStore::new();
    for attempt in 0..2 {
        let mut wizard = Wizard::new(QuestionnaireSettings::default());
        fill_profile(&mut wizard);
        fill_likert(&mut wizard);
        walk_to_last(&mut wizard);
        wizard.submit().unwrap();
        let result = submit::submit_confirmed(&mut wizard, &store, &collection(), Some(&account()), now()).await;
        if attempt == 1 {
            assert!(matches!(result, Err(SubmitError::AlreadySubmitted(_))));
            assert!(matches!(
                wizard.phase(),
                SubmissionPhase::Failed { failure: SubmitFailure::AlreadySubmitted, .. }
            ));
        }
    }
    assert_eq!(store.create_calls(), 1);
}

#[tokio::test]
async fn failed_write_keeps_state_and_can_be_retried() {
    let store = MemoryStore::new();
    store.fail_next_create(StorageError::Request("timed out".to_string()));

    let mut wizard = Wizard::new(QuestionnaireSettings::default());
    fill_profile(&mut wizard);
    fill_likert(&mut wizard);
    walk_to_last(&mut wizard);
    wizard.submit().unwrap();

    let first = submit::submit_confirmed(&mut wizard, &store, &collection(), Some(&account()), now()).await;
    assert!(matches!(first, Err(SubmitError::Storage(_))));
    assert!(wizard.step().is_last());
    assert_eq!(wizard.value("studentId"), Some("2101234"));
    assert_eq!(
        wizard.view().phase,
        PhaseView::Failed {
            failure: SubmitFailure::Backend,
            message: "Something went wrong. Please try again later.".to_string(),
        }
    );

    submit::submit_confirmed(&mut wizard, &store, &collection(), Some(&account()), now())
        .await
        .unwrap();
    assert_eq!(store.create_calls(), 2);
    assert_eq!(store.documents(&collection()).len(), 1);
}

#[tokio::test]
async fn signed_out_submission_is_not_written() {
    let store = MemoryStore::new();
    let mut wizard = Wizard::new(QuestionnaireSettings::default());
    fill_profile(&mut wizard);
    fill_likert(&mut wizard);
    walk_to_last(&mut wizard);
    wizard.submit().unwrap();

    let result = submit::submit_confirmed(&mut wizard, &store, &collection(), None, now()).await;
    assert!(matches!(result, Err(SubmitError::Unauthenticated)));
    assert_eq!(store.create_calls(), 0);
    assert!(matches!(
        wizard.view().phase,
        PhaseView::Failed { failure: SubmitFailure::Unauthenticated, .. }
    ));
}

#[test]
fn cancel_returns_to_editing() {
    let mut wizard = Wizard::new(QuestionnaireSettings::default());
    fill_profile(&mut wizard);
    fill_likert(&mut wizard);
    walk_to_last(&mut wizard);
    wizard.submit().unwrap();
    wizard.cancel_confirmation().unwrap();
    assert_eq!(*wizard.phase(), SubmissionPhase::Drafted);
    assert_eq!(wizard.value("interestedIn"), Some("music"));
}
