// Axum web server layer

use axum::{
    error_handling::HandleErrorLayer,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;

pub mod handlers;
pub mod middleware;
pub mod responses;

use crate::auth::auth_middleware::auth_middleware;
use crate::auth::{AuthFlow, AuthGate};
use crate::config::Config;
use crate::core::errors::AuthError;
use crate::core::metrics::AuthMetrics;
use crate::core::password::CredentialHasher;
use crate::core::token::TokenService;
use crate::store::{ContentRepository, UserRepository};

/// Application state containing all shared dependencies
///
/// All components are wrapped in Arc for shared ownership across async tasks.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthFlow>,
    pub gate: AuthGate,
    pub content: Arc<dyn ContentRepository>,
    pub metrics: Arc<AuthMetrics>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the auth core and stores together
    ///
    /// The token service is built from the configured secret here and
    /// nowhere else.
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        content: Arc<dyn ContentRepository>,
        hasher: CredentialHasher,
    ) -> Result<Self, AuthError> {
        let metrics = Arc::new(
            AuthMetrics::new().map_err(|e| AuthError::Internal(e.to_string()))?,
        );
        let tokens = Arc::new(TokenService::new(&config.jwt_secret));

        Ok(Self {
            auth: Arc::new(AuthFlow::new(users, hasher, tokens.clone(), metrics.clone())),
            gate: AuthGate::new(tokens, metrics.clone()),
            content,
            metrics,
            config: Arc::new(config),
        })
    }
}

/// Create the Axum router with all routes and middleware
///
/// Middleware stack (outermost to innermost):
/// - Tracing (tower-http::trace)
/// - Request timeout (tower::timeout), 408 on elapse
/// - Body size limit (tower-http::limit)
/// - Auth middleware, on the content routes only
///
/// `/health`, `/metrics`, signup and signin bypass the auth middleware.
pub fn create_router(app_state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/v1/content",
            post(handlers::create_content_handler)
                .get(handlers::list_content_handler)
                .delete(handlers::delete_content_handler),
        )
        .route(
            "/api/v1/content/:contentId",
            get(handlers::get_content_handler).delete(handlers::delete_content_by_id_handler),
        )
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    let public = Router::new()
        .route("/api/v1/signup", post(handlers::signup_handler))
        .route("/api/v1/signin", post(handlers::signin_handler))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler));

    let body_limit = app_state.config.body_size_limit_bytes;
    let timeout = Duration::from_secs(app_state.config.request_timeout_secs);

    public
        .merge(protected)
        .layer(middleware::body_size_limit_layer(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(middleware::handle_middleware_error))
                .timeout(timeout),
        )
        .layer(middleware::tracing_layer())
        .with_state(app_state)
}
