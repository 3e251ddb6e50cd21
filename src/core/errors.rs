// Domain error types - Secure error handling with no information disclosure

use thiserror::Error;

/// Main error type for authentication, authorization and ownership-scoped storage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed signup input (HTTP 401)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Username already registered (HTTP 409)
    #[error("Username is already registered")]
    DuplicateIdentity,

    /// No credential record for the username (HTTP 401, reported as invalid credentials)
    #[error("User is not registered")]
    NotRegistered,

    /// Password did not match the stored digest (HTTP 401)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No Authorization header on a protected request (HTTP 401)
    #[error("Missing credentials")]
    MissingCredentials,

    /// Token signature does not match the server secret (HTTP 403)
    #[error("Token signature is invalid")]
    InvalidSignature,

    /// Token reached its expiry instant (HTTP 403)
    #[error("Token has expired")]
    Expired,

    /// Token could not be parsed into the expected shape (HTTP 403)
    #[error("Token is malformed")]
    Malformed,

    /// Generic rejection of a presented token (HTTP 403)
    #[error("Unauthorized")]
    Unauthorized,

    /// Content payload is missing required fields (HTTP 400)
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// Record does not exist under the caller's identity (HTTP 404)
    #[error("Content not found for this identity")]
    NotFoundForOwner,

    /// Persistence collaborator failed (HTTP 500)
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Configuration error (HTTP 500)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unexpected internal fault, e.g. a failed hashing task (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 401,
            AuthError::DuplicateIdentity => 409,
            AuthError::NotRegistered => 401,
            AuthError::InvalidCredentials => 401,
            AuthError::MissingCredentials => 401,
            AuthError::InvalidSignature => 403,
            AuthError::Expired => 403,
            AuthError::Malformed => 403,
            AuthError::Unauthorized => 403,
            AuthError::InvalidContent(_) => 400,
            AuthError::NotFoundForOwner => 404,
            AuthError::Persistence(_) => 500,
            AuthError::Configuration(_) => 500,
            AuthError::Internal(_) => 500,
        }
    }

    /// Get user-friendly error message (no sensitive information)
    ///
    /// Unknown user and wrong password share one message, and every token
    /// failure shares another, so responses cannot be used to enumerate
    /// usernames or reveal token internals.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Validation(reason) => format!("Invalid signup details: {}", reason),
            AuthError::DuplicateIdentity => "Username is already taken".to_string(),
            AuthError::NotRegistered | AuthError::InvalidCredentials => {
                "Invalid username or password".to_string()
            }
            AuthError::MissingCredentials => {
                "Authorization header missing or invalid".to_string()
            }
            AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::Malformed
            | AuthError::Unauthorized => {
                "You are not logged in or token is invalid".to_string()
            }
            AuthError::InvalidContent(reason) => reason.clone(),
            AuthError::NotFoundForOwner => "Content not found".to_string(),
            AuthError::Persistence(_) => "Internal error".to_string(),
            AuthError::Configuration(_) => "Internal error".to_string(),
            AuthError::Internal(_) => "Internal error".to_string(),
        }
    }

    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "validation",
            AuthError::DuplicateIdentity => "duplicate_identity",
            AuthError::NotRegistered => "not_registered",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "expired",
            AuthError::Malformed => "malformed",
            AuthError::Unauthorized => "unauthorized",
            AuthError::InvalidContent(_) => "invalid_content",
            AuthError::NotFoundForOwner => "not_found_for_owner",
            AuthError::Persistence(_) => "persistence",
            AuthError::Configuration(_) => "configuration",
            AuthError::Internal(_) => "internal",
        }
    }

    /// Token verification failures, collapsed into `Unauthorized` at the gate
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidSignature | AuthError::Expired | AuthError::Malformed
        )
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Persistence(err.to_string())
    }
}
