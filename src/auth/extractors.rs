//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::models::CurrentUser;
use crate::common::ApiError;

/// Authenticated user extractor
///
/// Reads the identity the session gate attached to the request. Handlers
/// taking this argument answer 401 on their own, independent of the gate.
#[derive(Debug)]
pub struct AuthedUser {
    pub id: String,
    pub email: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<CurrentUser>() {
            Some(user) => Ok(AuthedUser {
                id: user.id.clone(),
                email: user.email.clone(),
            }),
            None => {
                warn!(path = %parts.uri.path(), "Authentication failed: no session on request");
                Err(ApiError::unauthorized())
            }
        }
    }
}
