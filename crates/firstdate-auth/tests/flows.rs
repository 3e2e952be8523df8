use firstdate_auth::error::AuthError;
use firstdate_auth::flows::{self, DASHBOARD_PATH, QUESTIONNAIRE_PATH};
use firstdate_auth::forms::{
    EmailPolicy, RecoveryConfirmForm, RecoveryRequestForm, RegisterForm, SignInForm, VerificationConfirmForm,
};
use firstdate_auth::memory::MemoryAccounts;
use firstdate_auth::service::AccountService;

const ORIGIN: &str = "https://firstdate.example";

fn register_form(email: &str) -> RegisterForm {
    RegisterForm {
        name: "Ada Lovelace".to_string(),
        email: email.to_string(),
        password: "Secret123".to_string(),
        confirm_password: "Secret123".to_string(),
    }
}

#[tokio::test]
async fn register_signs_in_and_sends_verification() {
    let accounts = MemoryAccounts::new();
    let signed_in = flows::register(&accounts, &EmailPolicy::default(), &register_form("u1@warwick.ac.uk"), ORIGIN)
        .await
        .unwrap();

    assert_eq!(signed_in.redirect, QUESTIONNAIRE_PATH);
    assert_eq!(signed_in.account.email, "u1@warwick.ac.uk");
    assert_eq!(
        accounts.current_account(&signed_in.session.secret).await.unwrap().id,
        signed_in.account.id
    );

    let links = accounts.verification_links();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].url, "https://firstdate.example/auth/verify");

    flows::confirm_verification(
        &accounts,
        &VerificationConfirmForm {
            user_id: Some(links[0].user_id.clone()),
            secret: Some(links[0].secret.clone()),
        },
    )
    .await
    .unwrap();
    assert!(accounts.current_account(&signed_in.session.secret).await.unwrap().email_verified);
}

#[tokio::test]
async fn duplicate_registration_is_reported() {
    let accounts = MemoryAccounts::new();
    let policy = EmailPolicy::default();
    flows::register(&accounts, &policy, &register_form("u1@warwick.ac.uk"), ORIGIN)
        .await
        .unwrap();
    let err = flows::register(&accounts, &policy, &register_form("u1@warwick.ac.uk"), ORIGIN)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AlreadyExists));
    assert_eq!(err.user_message(), "An account with this email already exists");
}

#[tokio::test]
async fn sign_in_outside_the_institution_makes_no_call() {
    let accounts = MemoryAccounts::new();
    let form = SignInForm {
        email: "someone@gmail.com".to_string(),
        password: "Secret123".to_string(),
    };
    let err = flows::sign_in(&accounts, &EmailPolicy::default(), &form).await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
    assert_eq!(accounts.calls(), 0);
}

#[tokio::test]
async fn invalid_registration_makes_no_call() {
    let accounts = MemoryAccounts::new();
    let mut form = register_form("u1@warwick.ac.uk");
    form.confirm_password = "Different1".to_string();
    let err = flows::register(&accounts, &EmailPolicy::default(), &form, ORIGIN)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Validation(ref fields) if fields[0].field == "confirmPassword"));
    assert_eq!(accounts.calls(), 0);
}

#[tokio::test]
async fn sign_in_with_wrong_password_is_invalid_credentials() {
    let accounts = MemoryAccounts::new();
    let policy = EmailPolicy::default();
    flows::register(&accounts, &policy, &register_form("u1@warwick.ac.uk"), ORIGIN)
        .await
        .unwrap();

    let wrong = SignInForm {
        email: "u1@warwick.ac.uk".to_string(),
        password: "Wrong1234".to_string(),
    };
    let err = flows::sign_in(&accounts, &policy, &wrong).await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid email or password");

    let right = SignInForm {
        email: "u1@warwick.ac.uk".to_string(),
        password: "Secret123".to_string(),
    };
    let signed_in = flows::sign_in(&accounts, &policy, &right).await.unwrap();
    assert_eq!(signed_in.redirect, DASHBOARD_PATH);

    flows::sign_out(&accounts, &signed_in.session.secret).await.unwrap();
    assert!(matches!(
        accounts.current_account(&signed_in.session.secret).await,
        Err(AuthError::Unauthorized)
    ));
}

#[tokio::test]
async fn password_recovery_round_trip() {
    let accounts = MemoryAccounts::new();
    let policy = EmailPolicy::default();
    flows::register(&accounts, &policy, &register_form("u1@live.warwick.ac.uk"), ORIGIN)
        .await
        .unwrap();

    flows::request_recovery(
        &accounts,
        &policy,
        &RecoveryRequestForm {
            email: "u1@live.warwick.ac.uk".to_string(),
        },
        ORIGIN,
    )
    .await
    .unwrap();
    let links = accounts.recovery_links();
    assert_eq!(links[0].url, "https://firstdate.example/auth/reset-password/confirm");

    flows::confirm_recovery(
        &accounts,
        &RecoveryConfirmForm {
            user_id: Some(links[0].user_id.clone()),
            secret: Some(links[0].secret.clone()),
            password: "NewSecret9".to_string(),
            confirm_password: "NewSecret9".to_string(),
        },
    )
    .await
    .unwrap();

    let form = SignInForm {
        email: "u1@live.warwick.ac.uk".to_string(),
        password: "NewSecret9".to_string(),
    };
    assert!(flows::sign_in(&accounts, &policy, &form).await.is_ok());
}
