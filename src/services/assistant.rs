// src/services/assistant.rs
//! Client for the external question-answering service.
//!
//! The service is a plain `GET /?query=...&user_id=...` endpoint answering
//! with arbitrary JSON. There is no retry and no timeout beyond the shared
//! reqwest client's defaults.

use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Clone)]
pub struct AssistantService {
    base_url: String,
    http: Client,
}

impl AssistantService {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    /// Asks the assistant `query` on behalf of `user_id` and returns its JSON answer
    pub async fn ask(&self, query: &str, user_id: &str) -> Result<Value, AssistantError> {
        debug!(
            user_id = %user_id,
            query_chars = query.chars().count(),
            "Forwarding chat query to assistant"
        );

        let response = self
            .http
            .get(&self.base_url)
            .header(CONTENT_TYPE, "application/json")
            .query(&[("query", query), ("user_id", user_id)])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, url = %self.base_url, "Assistant unreachable");
                AssistantError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Assistant returned an error");
            return Err(AssistantError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Value>().await.map_err(|e| {
            error!(error = %e, "Assistant response was not JSON");
            AssistantError::InvalidResponse(e.to_string())
        })
    }
}
