//! Pipeline-level tests for the registration, login, and profile-read
//! services, exercised directly against a scratch store and scratch storage
//! directories.

use skorr::config::SecurityConfig;
use skorr::db::Store;
use skorr::library::{ReceivedUpload, UploadVault};
use skorr::services::{
    AccountError, AccountService, DefaultOnboardingService, OnboardingService, RegisterError,
    RegistrationRequest, SeaOrmAccountService,
};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const SAMPLE_DOCUMENT: &[u8] =
    br#"{"MonthlyIncome":5000,"loanHistory":[{"status":"paid"},{"status":"paid"},{"status":"unpaid"}]}"#;

struct TestEnv {
    store: Store,
    upload_dir: PathBuf,
    retained_dir: PathBuf,
}

impl TestEnv {
    fn retained_count(&self) -> usize {
        std::fs::read_dir(&self.retained_dir).map_or(0, Iterator::count)
    }
}

/// Low-cost Argon2 params keep the test suite fast; the pipeline is the thing
/// under test, not the work factor.
fn fast_security() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    }
}

async fn test_env() -> (DefaultOnboardingService, TestEnv) {
    let root = std::env::temp_dir().join(format!("skorr-pipeline-test-{}", Uuid::new_v4()));
    let upload_dir = root.join("uploads");
    let retained_dir = root.join("retained");

    let store = Store::new(&format!("sqlite:{}", root.join("skorr.db").display()))
        .await
        .expect("Failed to open scratch store");

    let vault = UploadVault::new(&retained_dir);
    vault.ensure_exists().await.unwrap();
    tokio::fs::create_dir_all(&upload_dir).await.unwrap();

    let service = DefaultOnboardingService::new(store.clone(), vault, fast_security());

    (
        service,
        TestEnv {
            store,
            upload_dir,
            retained_dir,
        },
    )
}

async fn write_upload(dir: &Path, contents: &[u8]) -> ReceivedUpload {
    let path = dir.join(format!("{}_profile.json", Uuid::new_v4()));
    tokio::fs::write(&path, contents).await.unwrap();
    ReceivedUpload {
        path,
        original_name: "profile.json".to_string(),
    }
}

fn request(username: &str, email: &str, upload: Option<ReceivedUpload>) -> RegistrationRequest {
    RegistrationRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: "correct horse battery".to_string(),
        upload,
    }
}

#[tokio::test]
async fn successful_registration_commits_and_discards_the_transient() {
    let (service, env) = test_env().await;
    let upload = write_upload(&env.upload_dir, SAMPLE_DOCUMENT).await;
    let transient_path = upload.path.clone();

    service
        .register(request("alice", "alice@example.com", Some(upload)))
        .await
        .unwrap();

    let user = env
        .store
        .get_user_by_username("alice")
        .await
        .unwrap()
        .expect("record should exist");
    assert_eq!(user.email, "alice@example.com");
    assert!(user.financial_profile.contains("MonthlyIncome"));
    assert!(Path::new(&user.retained_file_path).exists());

    assert!(!transient_path.exists());
    assert_eq!(env.retained_count(), 1);
}

#[tokio::test]
async fn duplicate_identity_rolls_back_the_retained_copy() {
    let (service, env) = test_env().await;

    let first = write_upload(&env.upload_dir, SAMPLE_DOCUMENT).await;
    service
        .register(request("alice", "alice@example.com", Some(first)))
        .await
        .unwrap();

    let second = write_upload(&env.upload_dir, SAMPLE_DOCUMENT).await;
    let second_path = second.path.clone();
    let result = service
        .register(request("alice", "fresh@example.com", Some(second)))
        .await;

    assert!(matches!(result, Err(RegisterError::Conflict)));
    assert!(!second_path.exists());
    assert_eq!(env.retained_count(), 1);
    assert_eq!(env.store.user_count().await.unwrap(), 1);
}

#[tokio::test]
async fn malformed_document_fails_validation_and_cleans_up() {
    let (service, env) = test_env().await;
    let upload = write_upload(&env.upload_dir, b"definitely not json").await;
    let transient_path = upload.path.clone();

    let result = service
        .register(request("alice", "alice@example.com", Some(upload)))
        .await;

    assert!(matches!(result, Err(RegisterError::Validation(_))));
    assert!(!transient_path.exists());
    assert_eq!(env.retained_count(), 0);
    assert_eq!(env.store.user_count().await.unwrap(), 0);
}

#[tokio::test]
async fn missing_upload_fails_validation() {
    let (service, env) = test_env().await;

    let result = service
        .register(request("alice", "alice@example.com", None))
        .await;

    assert!(matches!(result, Err(RegisterError::Validation(_))));
    assert_eq!(env.store.user_count().await.unwrap(), 0);
}

#[tokio::test]
async fn missing_identity_fields_still_discard_the_upload() {
    let (service, env) = test_env().await;
    let upload = write_upload(&env.upload_dir, SAMPLE_DOCUMENT).await;
    let transient_path = upload.path.clone();

    let result = service.register(request("", "", Some(upload))).await;

    assert!(matches!(result, Err(RegisterError::Validation(_))));
    assert!(!transient_path.exists());
    assert_eq!(env.retained_count(), 0);
}

#[tokio::test]
async fn concurrent_registrations_have_exactly_one_winner() {
    let (service, env) = test_env().await;

    let first = write_upload(&env.upload_dir, SAMPLE_DOCUMENT).await;
    let second = write_upload(&env.upload_dir, SAMPLE_DOCUMENT).await;

    let (a, b) = tokio::join!(
        service.register(request("alice", "alice@example.com", Some(first))),
        service.register(request("alice", "other@example.com", Some(second))),
    );

    let results = [a, b];
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(RegisterError::Conflict))));

    assert_eq!(env.store.user_count().await.unwrap(), 1);
    // The loser's retained copy was rolled back.
    assert_eq!(env.retained_count(), 1);
}

#[tokio::test]
async fn login_and_profile_read_round_trip() {
    let (service, env) = test_env().await;
    let upload = write_upload(&env.upload_dir, SAMPLE_DOCUMENT).await;

    service
        .register(request("alice", "alice@example.com", Some(upload)))
        .await
        .unwrap();

    let accounts = SeaOrmAccountService::new(env.store.clone());

    let summary = accounts
        .login("alice", "correct horse battery")
        .await
        .unwrap();
    assert_eq!(summary.financial_summary.monthly_income, Some(5000.0));
    assert_eq!(summary.loan_history.len(), 3);

    let report = accounts.read_profile("alice").await.unwrap();
    assert_eq!(report.score, 660);
    assert_eq!(report.email, "alice@example.com");

    // Wrong password and unknown username are the same error.
    let wrong_password = accounts.login("alice", "nope").await.unwrap_err();
    let unknown_user = accounts.login("mallory", "nope").await.unwrap_err();
    assert!(matches!(wrong_password, AccountError::InvalidCredentials));
    assert!(matches!(unknown_user, AccountError::InvalidCredentials));

    let missing = accounts.read_profile("mallory").await.unwrap_err();
    assert!(matches!(missing, AccountError::NotFound(_)));
}
