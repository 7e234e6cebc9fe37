use super::handlers;
use axum::{
    routing::{get, patch},
    Router,
};

/// Creates the todos router
pub fn todos_routes() -> Router {
    Router::new()
        .route(
            "/api/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/api/todos/:id",
            patch(handlers::update_todo).delete(handlers::delete_todo),
        )
}
