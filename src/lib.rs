pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod media;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod related;
pub mod routes;
pub mod slug;
pub mod state;
pub mod validation;
pub mod worker;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::Config;
use crate::media::LocalMediaStore;
use crate::rate_limit::{ContactRateLimiter, LoginRateLimiter};
use crate::state::{AppState, SharedState};

pub fn build_state(pool: PgPool, config: Config) -> SharedState {
    Arc::new(AppState {
        pool,
        media: Arc::new(LocalMediaStore::new(config.media_root.clone())),
        contact_limiter: ContactRateLimiter::new(),
        login_limiter: LoginRateLimiter::new(),
        config,
    })
}

pub fn build_app(pool: PgPool, config: Config) -> Router {
    router(build_state(pool, config))
}

/// The full application over an already assembled state.
pub fn router(state: SharedState) -> Router {
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_size = state.config.max_body_size;
    let media_service = ServeDir::new(&state.config.media_root);

    Router::new()
        .merge(routes::api_routes())
        .nest_service(&state.config.media_url, media_service)
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

/// The public site calls the API from the browser. No configured origins means any origin,
/// without credentials.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(3600));

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{o}': {e}");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(AllowOrigin::any())
    } else {
        layer.allow_origin(parsed).allow_credentials(true)
    }
}

async fn health() -> &'static str {
    "ok"
}
