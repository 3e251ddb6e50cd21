// Axum authorization middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::api::responses::ApiError;
use crate::api::AppState;
use crate::auth::gate::GateOutcome;

/// Authorization middleware function
///
/// Runs the gate over the request headers. On success the caller's
/// `Identity` is placed in request extensions for handlers; on rejection the
/// protected handler never runs.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match app_state.gate.authorize_headers(request.headers()) {
        GateOutcome::Authorized(identity) => {
            debug!(user_id = %identity, path = %request.uri().path(), "Request authorized");
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        GateOutcome::Rejected(rejection) => Err(ApiError::from(rejection.into_error())),
    }
}
