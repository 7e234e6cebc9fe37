use super::models::ChatRequest;
use crate::auth::AuthedUser;
use crate::common::{ApiError, SharedState, Validator};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use serde_json::Value;
use tracing::warn;

/// POST /api/chat
/// Relays a question to the assistant service on the caller's behalf
///
/// # Request Body
/// ```json
/// { "query": "What are my classes today?" }
/// ```
///
/// The assistant's JSON answer is returned as-is. Any upstream failure is
/// reported as 502 with a fixed message.
pub async fn chat_handler(
    Extension(state): Extension<SharedState>,
    user: AuthedUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let request = ChatRequest::from_json(&body);
    request.validate().into_result()?;

    let query = request.query.unwrap_or_default();
    let assistant = state.read().await.assistant.clone();

    let answer = assistant.ask(&query, &user.id).await.map_err(|e| {
        warn!(error = %e, user_id = %user.id, "Chat proxy upstream failure");
        ApiError::BadGateway("AI service unavailable".to_string())
    })?;

    Ok(Json(answer))
}
