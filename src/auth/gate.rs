// Authorization gate for protected operations

use crate::core::errors::AuthError;
use crate::core::metrics::AuthMetrics;
use crate::core::models::Identity;
use crate::core::token::TokenService;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

const BEARER_PREFIX: &str = "bearer ";

/// Why a protected request was turned away
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No Authorization header, or an empty one
    Missing,
    /// A token was presented but failed verification
    Invalid(AuthError),
}

impl Rejection {
    /// Error reported to the caller
    ///
    /// Token failures are kept for logs and metrics only. Callers see one
    /// generic token failure regardless of the cause. Anything else the
    /// verifier reports passes through unchanged.
    pub fn into_error(self) -> AuthError {
        match self {
            Rejection::Missing => AuthError::MissingCredentials,
            Rejection::Invalid(cause) if cause.is_token_error() => AuthError::Unauthorized,
            Rejection::Invalid(cause) => cause,
        }
    }

    /// Metrics label
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::Missing => "missing",
            Rejection::Invalid(cause) => cause.kind(),
        }
    }
}

/// Result of gating a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Authorized(Identity),
    Rejected(Rejection),
}

/// Verifies the Authorization header before a protected operation runs
#[derive(Clone)]
pub struct AuthGate {
    tokens: Arc<TokenService>,
    metrics: Arc<AuthMetrics>,
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenService>, metrics: Arc<AuthMetrics>) -> Self {
        Self { tokens, metrics }
    }

    /// Gate a request by its headers
    ///
    /// A header that is not valid UTF-8 counts as a malformed token.
    pub fn authorize_headers(&self, headers: &HeaderMap) -> GateOutcome {
        match headers.get(AUTHORIZATION) {
            None => self.authorize(None),
            Some(value) => match value.to_str() {
                Ok(raw) => self.authorize(Some(raw)),
                Err(_) => self.reject(Rejection::Invalid(AuthError::Malformed)),
            },
        }
    }

    /// Gate a raw Authorization header value
    pub fn authorize(&self, header: Option<&str>) -> GateOutcome {
        self.authorize_at(header, Utc::now())
    }

    /// Gate a raw Authorization header value at a fixed instant
    pub fn authorize_at(&self, header: Option<&str>, now: DateTime<Utc>) -> GateOutcome {
        let raw = match header.map(str::trim) {
            None | Some("") => return self.reject(Rejection::Missing),
            Some(raw) => raw,
        };

        match self.tokens.verify_at(extract_token(raw), now) {
            Ok(identity) => GateOutcome::Authorized(identity),
            Err(cause) => self.reject(Rejection::Invalid(cause)),
        }
    }

    fn reject(&self, rejection: Rejection) -> GateOutcome {
        let reason = rejection.reason();
        self.metrics.record_gate_rejection(reason);
        debug!(reason, "Protected request rejected");
        GateOutcome::Rejected(rejection)
    }
}

/// Strip an optional `Bearer ` scheme prefix (case-insensitive)
fn extract_token(raw: &str) -> &str {
    match raw.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => raw[BEARER_PREFIX.len()..].trim(),
        _ => raw,
    }
}
