/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers
 *
 * - `TraceLayer` opens a span per request (method and matched route)
 * - `CorsLayer` admits the frontend origin with credentials, so the
 *   browser sends the auth cookies on cross-origin calls
 */

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{CONTENT_TYPE, USER_AGENT},
        HeaderValue, Method, Request, StatusCode,
    },
    routing::get,
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info_span, Span};

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::error::BackendError;
use crate::backend::routes::account_routes::configure_account_routes;
use crate::backend::routes::auth_routes::configure_auth_routes;
use crate::backend::server::state::AppState;
use crate::shared::ConfigError;

/// Create the Axum router with all routes configured
///
/// # Routes
///
/// - `GET /health` - Liveness check
/// - `/auth/*` - Public auth endpoints (see `auth_routes`)
/// - `/user`, `/sessions` - Authenticated account endpoints
///
/// Unknown paths answer `404` with the usual error body.
///
/// # Errors
///
/// Fails when `APP_ORIGIN` cannot be used as a header value.
pub fn create_router(app_state: AppState) -> Result<Router, BackendError> {
    let cors = cors_layer(&app_state.config.app_origin)?;

    let router = Router::new().route("/health", get(health));
    let router = configure_auth_routes(router);
    let router = configure_account_routes(router, app_state.clone());

    let router = router
        .fallback(|| async { BackendError::not_found("Not found") })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors),
        );

    Ok(router.with_state(app_state))
}

async fn health() -> (StatusCode, Json<MessageResponse>) {
    (StatusCode::OK, Json(MessageResponse::new("OK")))
}

fn cors_layer(app_origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = HeaderValue::from_str(app_origin.trim_end_matches('/'))
        .map_err(|_| ConfigError::InvalidUrl(app_origin.to_string()))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE, USER_AGENT])
        .allow_credentials(true))
}

fn make_span(request: &Request<Body>) -> Span {
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
    )
}
