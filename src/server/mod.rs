pub mod routes;

use crate::state::AppState;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Full HTTP surface: session view, calculation, reset, counters, health.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/session", get(routes::get_session))
        .route("/api/calculate", post(routes::post_calculate))
        .route("/api/reset", post(routes::post_reset))
        .route("/api/counters", get(routes::get_counters))
        .route("/health", get(routes::health))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

/// Session id carried in the `Cookie` header, if present and well formed.
pub fn session_id(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

pub fn session_cookie(cookie_name: &str, id: Uuid) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!("{cookie_name}={id}; Path=/; HttpOnly; SameSite=Lax")).ok()
}
