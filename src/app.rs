// src/app.rs
use axum::{
    extract::Extension,
    http::{header, HeaderName, HeaderValue, Method},
    middleware, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{self, session_gate};
use crate::common::SharedState;
use crate::{chat, logging_middleware, pages, todos};

/// Composes every route group behind the session gate.
///
/// Layers run outermost first: trace, CORS, state, body logging, then the
/// gate. The gate reads `SharedState`, so the extension must wrap it.
pub fn build_router(shared: SharedState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(auth::auth_routes())
        .merge(todos::todos_routes())
        .merge(chat::chat_routes())
        .merge(pages::pages_routes())
        .layer(middleware::from_fn(session_gate))
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(shared))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true)
}
