use axum::extract::DefaultBodyLimit;
use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::{routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::http::types::ApiError;

/// Request bodies above this size are rejected with 413.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Wraps the resource router with the health check, the 404 fallback and the
/// middleware every response goes through.
pub fn app(router: Router) -> Router {
    Router::new()
        .route("/health", get(|| async { Json("ok") }))
        .merge(router)
        .fallback(|| async { ApiError::new(StatusCode::NOT_FOUND, "no such route") })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(CONTENT_TYPE, HeaderValue::from_static("application/json")))
                .layer(SetResponseHeaderLayer::overriding(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")))
                .layer(SetResponseHeaderLayer::if_not_present(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type")))
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
}
