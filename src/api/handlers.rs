// Request handlers for API endpoints

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::responses::{
    ApiError, ContentListResponse, ContentResponse, CreatedContentResponse, DeleteResponse,
    HealthResponse, SignupResponse, TokenResponse,
};
use crate::api::AppState;
use crate::content::{parse_content_id, OwnedContent};
use crate::core::errors::AuthError;
use crate::core::models::{
    CreateContentRequest, DeleteContentRequest, Identity, SigninRequest, SignupRequest,
};

const HEALTH_PING_TIMEOUT: Duration = Duration::from_millis(800);

/// Unwrap a JSON body, turning extractor failures into a JSON 400
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            debug!(error = %rejection, "Rejected request body");
            Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "Request body must be valid JSON".to_string(),
            ))
        }
    }
}

/// Signup body extraction
///
/// A well-formed body whose fields have the wrong types is a validation
/// failure (401). Syntax errors and a missing content type stay 400.
fn signup_body(
    app_state: &AppState,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<SignupRequest, ApiError> {
    match body {
        Err(JsonRejection::JsonDataError(rejection)) => {
            debug!(error = %rejection, "Signup body has invalid field types");
            let err = AuthError::Validation("fields must be strings".to_string());
            app_state.metrics.record_signup(err.kind());
            Err(err.into())
        }
        other => json_body(other),
    }
}

/// POST /api/v1/signup
pub async fn signup_handler(
    State(app_state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SignupResponse>, ApiError> {
    let request = signup_body(&app_state, body)?;
    let identity = app_state.auth.signup(request).await?;

    Ok(Json(SignupResponse {
        message: "User signed up successfully".to_string(),
        user_id: identity.as_uuid(),
    }))
}

/// POST /api/v1/signin
pub async fn signin_handler(
    State(app_state): State<AppState>,
    body: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let request = json_body(body)?;
    let token = app_state.auth.signin(request).await?;
    Ok(Json(TokenResponse { token }))
}

/// POST /api/v1/content
pub async fn create_content_handler(
    State(app_state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<CreateContentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedContentResponse>), ApiError> {
    let request = json_body(body)?;
    let content = OwnedContent::new(app_state.content.as_ref(), identity)
        .create(request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedContentResponse {
            message: "Content created successfully".to_string(),
            content,
        }),
    ))
}

/// GET /api/v1/content
pub async fn list_content_handler(
    State(app_state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ContentListResponse>, ApiError> {
    let content = OwnedContent::new(app_state.content.as_ref(), identity)
        .list()
        .await?;
    Ok(Json(ContentListResponse { content }))
}

/// GET /api/v1/content/:contentId
pub async fn get_content_handler(
    State(app_state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(content_id): Path<String>,
) -> Result<Json<ContentResponse>, ApiError> {
    let content_id = parse_content_id(&content_id)?;
    let content = OwnedContent::new(app_state.content.as_ref(), identity)
        .get(content_id)
        .await?;
    Ok(Json(ContentResponse { content }))
}

/// DELETE /api/v1/content
///
/// Body `{contentId}` deletes that record. An empty body or `{}` deletes
/// everything the caller owns. Unknown keys and a null `contentId` are 400.
pub async fn delete_content_handler(
    State(app_state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Bytes,
) -> Result<Json<DeleteResponse>, ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        DeleteContentRequest::default()
    } else {
        serde_json::from_slice::<DeleteContentRequest>(&body).map_err(|e| {
            debug!(error = %e, "Rejected delete body");
            let message = if e.is_data() {
                "Delete body accepts only a string contentId"
            } else {
                "Request body must be valid JSON"
            };
            ApiError::new(StatusCode::BAD_REQUEST, message.to_string())
        })?
    };

    let owned = OwnedContent::new(app_state.content.as_ref(), identity);
    let deleted = match request.content_id {
        None => owned.delete_all().await?,
        Some(Some(raw)) => owned.delete(parse_content_id(&raw)?).await?,
        Some(None) => {
            return Err(AuthError::InvalidContent("Invalid content id".to_string()).into());
        }
    };

    Ok(Json(DeleteResponse {
        message: "Content deleted successfully".to_string(),
        deleted,
    }))
}

/// DELETE /api/v1/content/:contentId
pub async fn delete_content_by_id_handler(
    State(app_state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(content_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let content_id = parse_content_id(&content_id)?;
    let deleted = OwnedContent::new(app_state.content.as_ref(), identity)
        .delete(content_id)
        .await?;

    Ok(Json(DeleteResponse {
        message: "Content deleted successfully".to_string(),
        deleted,
    }))
}

/// GET /health
///
/// Always answers 200; a slow or failing store is reported in the body.
pub async fn health_handler(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let database = match tokio::time::timeout(HEALTH_PING_TIMEOUT, app_state.content.ping()).await {
        Ok(Ok(())) => "connected".to_string(),
        Ok(Err(e)) => {
            warn!(error = %e, "Store ping failed");
            "unavailable".to_string()
        }
        Err(_) => {
            warn!("Store ping timed out in health check");
            "slow: timeout".to_string()
        }
    };

    let status = if database == "connected" { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        database,
    })
}

/// GET /metrics
pub async fn metrics_handler(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let body = app_state
        .metrics
        .render()
        .map_err(|e| ApiError::from(AuthError::Internal(e.to_string())))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
