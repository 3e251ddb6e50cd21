// Signup and signin orchestration

use crate::auth::secret::Password;
use crate::core::errors::AuthError;
use crate::core::metrics::AuthMetrics;
use crate::core::models::{Identity, NewCredential, SigninRequest, SignupRequest};
use crate::core::password::CredentialHasher;
use crate::core::token::TokenService;
use crate::store::UserRepository;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{error, info, warn};

pub const PASSWORD_MIN_CHARS: usize = 7;
pub const PASSWORD_MAX_CHARS: usize = 15;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email pattern is valid")
});

/// Validated signup input
#[derive(Debug)]
pub struct SignupForm {
    pub username: String,
    pub password: Password,
    pub email: String,
}

impl SignupForm {
    /// Validate a raw signup request
    ///
    /// - username: non-empty (whitespace-only counts as empty)
    /// - password: 7 to 15 characters inclusive
    /// - email: `local@domain.tld`, no leading dot or `..` in the local part
    pub fn parse(request: SignupRequest) -> Result<Self, AuthError> {
        if request.username.trim().is_empty() {
            return Err(AuthError::Validation("username is required".to_string()));
        }

        let password = Password::new(&request.password);
        let length = password.char_len();
        if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&length) {
            return Err(AuthError::Validation(format!(
                "password must be between {} and {} characters",
                PASSWORD_MIN_CHARS, PASSWORD_MAX_CHARS
            )));
        }

        if !is_valid_email(&request.email) {
            return Err(AuthError::Validation("email is invalid".to_string()));
        }

        Ok(Self {
            username: request.username,
            password,
            email: request.email,
        })
    }
}

fn is_valid_email(email: &str) -> bool {
    let local = match email.split_once('@') {
        Some((local, _)) => local,
        None => return false,
    };
    !local.starts_with('.') && !local.contains("..") && EMAIL_PATTERN.is_match(email)
}

/// Authentication flow: credential creation and verification
pub struct AuthFlow {
    users: Arc<dyn UserRepository>,
    hasher: CredentialHasher,
    tokens: Arc<TokenService>,
    metrics: Arc<AuthMetrics>,
}

impl AuthFlow {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: CredentialHasher,
        tokens: Arc<TokenService>,
        metrics: Arc<AuthMetrics>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            metrics,
        }
    }

    /// Register a new user
    ///
    /// Returns the new identity; nothing sensitive is echoed back.
    pub async fn signup(&self, request: SignupRequest) -> Result<Identity, AuthError> {
        let result = self.register(request).await;
        match &result {
            Ok(identity) => {
                self.metrics.record_signup("success");
                info!(user_id = %identity, "User signed up");
            }
            Err(e) => {
                self.metrics.record_signup(e.kind());
                log_failure("Signup", e);
            }
        }
        result
    }

    async fn register(&self, request: SignupRequest) -> Result<Identity, AuthError> {
        let form = SignupForm::parse(request)?;

        if self.users.find_by_username(&form.username).await?.is_some() {
            return Err(AuthError::DuplicateIdentity);
        }

        let password_hash = self.hasher.hash(&form.password).await?;
        let record = self
            .users
            .insert_user(NewCredential {
                username: form.username,
                password_hash,
                email: form.email,
            })
            .await?;

        Ok(record.identity())
    }

    /// Verify credentials and issue a token
    ///
    /// Unknown usernames still pay for one bcrypt verification so the two
    /// failure paths take comparable time.
    pub async fn signin(&self, request: SigninRequest) -> Result<String, AuthError> {
        let result = self.authenticate(request).await;
        match &result {
            Ok(_) => self.metrics.record_signin("success"),
            Err(e) => {
                self.metrics.record_signin(e.kind());
                log_failure("Signin", e);
            }
        }
        result
    }

    async fn authenticate(&self, request: SigninRequest) -> Result<String, AuthError> {
        let password = Password::new(&request.password);

        let record = match self.users.find_by_username(&request.username).await? {
            Some(record) => record,
            None => {
                self.hasher.verify_decoy(&password).await;
                return Err(AuthError::NotRegistered);
            }
        };

        if !self.hasher.verify(&password, &record.password_hash).await {
            return Err(AuthError::InvalidCredentials);
        }

        let identity = record.identity();
        let token = self.tokens.issue(&identity)?;
        info!(user_id = %identity, "User signed in");
        Ok(token)
    }
}

fn log_failure(operation: &str, err: &AuthError) {
    match err.status_code() {
        500..=599 => error!(operation, kind = err.kind(), error = %err, "Authentication operation failed"),
        _ => warn!(operation, kind = err.kind(), "Authentication operation rejected"),
    }
}
