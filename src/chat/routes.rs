use super::handlers;
use axum::{routing::post, Router};

/// Creates the chat proxy router
pub fn chat_routes() -> Router {
    Router::new().route("/api/chat", post(handlers::chat_handler))
}
