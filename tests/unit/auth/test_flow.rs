// Unit tests for AuthFlow over in-memory and failing stores

use async_trait::async_trait;
use content_vault::auth::AuthFlow;
use content_vault::core::errors::AuthError;
use content_vault::core::metrics::AuthMetrics;
use content_vault::core::models::{
    CredentialRecord, NewCredential, SigninRequest, SignupRequest,
};
use content_vault::core::password::CredentialHasher;
use content_vault::core::token::TokenService;
use content_vault::auth::SigningSecret;
use content_vault::store::memory::MemoryStore;
use content_vault::store::UserRepository;
use std::sync::Arc;

use crate::common::{TEST_HASH_COST, TEST_PASSWORD};

/// User repository whose every call fails
struct FailingUserStore;

#[async_trait]
impl UserRepository for FailingUserStore {
    async fn find_by_username(&self, _username: &str) -> Result<Option<CredentialRecord>, AuthError> {
        Err(AuthError::Persistence("connection refused".to_string()))
    }

    async fn insert_user(&self, _user: NewCredential) -> Result<CredentialRecord, AuthError> {
        Err(AuthError::Persistence("connection refused".to_string()))
    }
}

fn tokens() -> Arc<TokenService> {
    Arc::new(TokenService::new(&SigningSecret::new("flow-test-secret").unwrap()))
}

fn flow(users: Arc<dyn UserRepository>) -> (AuthFlow, Arc<AuthMetrics>) {
    let metrics = Arc::new(AuthMetrics::new().unwrap());
    let flow = AuthFlow::new(
        users,
        CredentialHasher::with_cost(TEST_HASH_COST),
        tokens(),
        metrics.clone(),
    );
    (flow, metrics)
}

fn signup_request(username: &str) -> SignupRequest {
    SignupRequest {
        username: username.to_string(),
        password: TEST_PASSWORD.to_string(),
        email: format!("{}@example.com", username),
    }
}

fn signin_request(username: &str, password: &str) -> SigninRequest {
    SigninRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_signup_stores_digest_not_plaintext() {
    let store = Arc::new(MemoryStore::new());
    let (flow, _) = flow(store.clone());

    let identity = flow.signup(signup_request("alice")).await.unwrap();
    let record = store.find_by_username("alice").await.unwrap().unwrap();

    assert_eq!(record.identity(), identity);
    assert_ne!(record.password_hash, TEST_PASSWORD);
    assert!(record.password_hash.starts_with("$2"));
}

#[tokio::test]
async fn test_duplicate_signup() {
    let (flow, _) = flow(Arc::new(MemoryStore::new()));

    flow.signup(signup_request("alice")).await.unwrap();
    let err = flow.signup(signup_request("alice")).await.unwrap_err();
    assert_eq!(err, AuthError::DuplicateIdentity);
}

#[tokio::test]
async fn test_signin_distinguishes_kinds_internally() {
    let (flow, metrics) = flow(Arc::new(MemoryStore::new()));
    flow.signup(signup_request("alice")).await.unwrap();

    assert_eq!(
        flow.signin(signin_request("bob", TEST_PASSWORD)).await.unwrap_err(),
        AuthError::NotRegistered
    );
    assert_eq!(
        flow.signin(signin_request("alice", "wrongpass1")).await.unwrap_err(),
        AuthError::InvalidCredentials
    );
    assert!(flow.signin(signin_request("alice", TEST_PASSWORD)).await.is_ok());

    assert_eq!(metrics.signin_count("not_registered"), 1);
    assert_eq!(metrics.signin_count("invalid_credentials"), 1);
    assert_eq!(metrics.signin_count("success"), 1);
}

#[tokio::test]
async fn test_signin_token_resolves_to_signup_identity() {
    let (flow, _) = flow(Arc::new(MemoryStore::new()));
    let identity = flow.signup(signup_request("alice")).await.unwrap();

    let token = flow.signin(signin_request("alice", TEST_PASSWORD)).await.unwrap();
    assert_eq!(tokens().verify(&token).unwrap(), identity);
}

#[tokio::test]
async fn test_persistence_failures_surface_as_500() {
    let (flow, _) = flow(Arc::new(FailingUserStore));

    let err = flow.signup(signup_request("alice")).await.unwrap_err();
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.user_message(), "Internal error");

    let err = flow.signin(signin_request("alice", TEST_PASSWORD)).await.unwrap_err();
    assert!(matches!(err, AuthError::Persistence(_)));
}

#[tokio::test]
async fn test_validation_runs_before_store_access() {
    let (flow, _) = flow(Arc::new(FailingUserStore));

    let mut request = signup_request("alice");
    request.password = "short".to_string();
    assert!(matches!(
        flow.signup(request).await.unwrap_err(),
        AuthError::Validation(_)
    ));
}
