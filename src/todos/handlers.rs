use super::models::{CreateTodoRequest, ListTodosQuery, OkResponse, TodoPatch, TodoResponse};
use super::services::TodosService;
use super::validators::parse_limit;
use crate::auth::AuthedUser;
use crate::common::{ApiError, SharedState, Validator};
use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

/// GET /api/todos - The caller's todos, newest first, optionally capped by `limit`
pub async fn list_todos(
    Extension(state): Extension<SharedState>,
    user: AuthedUser,
    Query(query): Query<ListTodosQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = parse_limit(query.limit.as_deref())?;

    let app_state = state.read().await;
    let todos_service = TodosService::new(app_state.db.clone());

    let todos: Vec<TodoResponse> = todos_service
        .list_for_user(&user.id, limit)
        .await?
        .into_iter()
        .map(TodoResponse::from)
        .collect();

    Ok(Json(todos))
}

/// POST /api/todos - Create a todo owned by the caller
pub async fn create_todo(
    Extension(state): Extension<SharedState>,
    user: AuthedUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let request = CreateTodoRequest::from_json(&body);
    request.validate().into_result()?;

    let title = request.title.unwrap_or_default();

    let app_state = state.read().await;
    let todos_service = TodosService::new(app_state.db.clone());

    let todo = todos_service.create(&user.id, &title).await?;

    Ok((StatusCode::CREATED, Json(TodoResponse::from(todo))))
}

/// PATCH /api/todos/:id - Update `completed` and/or `title` on one of the caller's todos
pub async fn update_todo(
    Extension(state): Extension<SharedState>,
    user: AuthedUser,
    Path(todo_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let patch = TodoPatch::from_json(&body);
    patch.validate().into_result()?;

    let app_state = state.read().await;
    let todos_service = TodosService::new(app_state.db.clone());

    todos_service.update(&user.id, &todo_id, &patch).await?;

    Ok(Json(OkResponse { ok: true }))
}

/// DELETE /api/todos/:id - Delete one of the caller's todos; succeeds even if nothing matched
pub async fn delete_todo(
    Extension(state): Extension<SharedState>,
    user: AuthedUser,
    Path(todo_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let todos_service = TodosService::new(app_state.db.clone());

    todos_service.delete(&user.id, &todo_id).await?;

    Ok(Json(OkResponse { ok: true }))
}
