// Middleware stack for request limits and observability

use axum::{http::StatusCode, BoxError};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::api::responses::ApiError;

/// Tracing middleware
///
/// Logs method, path, status and latency for every request.
pub fn tracing_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

/// Body size limit middleware
///
/// Returns 413 Payload Too Large if exceeded.
pub fn body_size_limit_layer(limit_bytes: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(limit_bytes)
}

/// Convert errors from the timeout layer into HTTP responses
///
/// An elapsed request timeout answers 408; anything else is a 500.
pub async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("Request timed out");
        ApiError::new(StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        warn!(error = %err, "Unhandled middleware error");
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error".to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_elapsed_maps_to_request_timeout() {
        let err: BoxError = Box::new(tower::timeout::error::Elapsed::new());
        assert_eq!(handle_middleware_error(err).await.status, StatusCode::REQUEST_TIMEOUT);

        let err: BoxError = "boom".into();
        assert_eq!(
            handle_middleware_error(err).await.status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
