// Response types for API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::core::errors::AuthError;
use crate::core::models::ContentView;

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Signin success body
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Created content body (`POST /api/v1/content`)
#[derive(Debug, Serialize)]
pub struct CreatedContentResponse {
    pub message: String,
    pub content: ContentView,
}

/// Content listing body
#[derive(Debug, Serialize)]
pub struct ContentListResponse {
    pub content: Vec<ContentView>,
}

/// Single content body
#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub content: ContentView,
}

/// Delete acknowledgement with the number of records removed
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub deleted: u64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// Signup acknowledgement carrying the new user's id
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub user_id: Uuid,
}

/// API error type that converts domain errors to HTTP responses
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: String) -> Self {
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(kind = err.kind(), error = %err, "Request failed");
        }
        Self::new(status, err.user_message())
    }
}
