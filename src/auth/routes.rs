//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/session` - Exchange an ID token for a session cookie
/// - `DELETE /api/auth/session` - Sign out
/// - `GET /api/me` - Current user information
pub fn auth_routes() -> Router {
    Router::new()
        .route(
            "/api/auth/session",
            post(handlers::create_session).delete(handlers::delete_session),
        )
        .route("/api/me", get(handlers::me_handler))
}
