//! Authentication handlers

use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    http::{header::USER_AGENT, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;
use tracing::{error, info, warn};

use super::extractors::AuthedUser;
use super::gate::{removal_cookie, session_cookie, SESSION_COOKIE};
use super::models::{ClientInfo, SessionStatusResponse, SessionUserResponse, User};
use crate::common::helpers::safe_token_log;
use crate::common::{ApiError, SharedState};
use crate::services::IdentityError;

/// Prefers proxy headers, first hop of `X-Forwarded-For` wins
fn client_info(headers: &HeaderMap) -> ClientInfo {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string());

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    ClientInfo {
        ip_address: forwarded.or(real_ip).filter(|ip| !ip.is_empty()),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string),
    }
}

/// POST /api/auth/session
/// Exchanges an identity-provider ID token for a session cookie
///
/// # Request Body
/// ```json
/// { "token": "<firebase id token>" }
/// ```
///
/// # Response
/// `200 {"status": "signedIn"}` plus a `session` cookie valid for five days
pub async fn create_session(
    Extension(state_lock): Extension<SharedState>,
    headers: HeaderMap,
    jar: CookieJar,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(CookieJar, Json<SessionStatusResponse>), ApiError> {
    let state = state_lock.read().await.clone();
    let Json(body) = payload?;

    let token = match body.get("token").and_then(Value::as_str) {
        Some(token) if !token.is_empty() => token,
        _ => {
            warn!("Session request without token");
            return Err(ApiError::BadRequest("No token provided.".to_string()));
        }
    };

    let identity = state.identity.verify_id_token(token).await.map_err(|e| match e {
        IdentityError::InvalidToken(reason) => {
            warn!(token = %safe_token_log(token), reason = %reason, "ID token rejected");
            ApiError::Unauthorized("Could not create session.".to_string())
        }
        IdentityError::KeyFetch(reason) => {
            error!(reason = %reason, "Identity provider unavailable");
            ApiError::BadGateway("Identity provider unavailable".to_string())
        }
    })?;

    let issued = state.sessions.issue(&identity, &client_info(&headers)).await?;

    info!(user_id = %issued.user_id, expires_at = %issued.expires_at, "Signed in");

    Ok((
        jar.add(session_cookie(issued.cookie_value, state.cookie_secure)),
        Json(SessionStatusResponse { status: "signedIn" }),
    ))
}

/// DELETE /api/auth/session
/// Clears the session cookie unconditionally and revokes its row when it decodes
pub async fn delete_session(
    Extension(state_lock): Extension<SharedState>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionStatusResponse>) {
    let state = state_lock.read().await.clone();

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        match state.sessions.revoke(cookie.value()).await {
            Ok(true) => info!("Session revoked"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Could not revoke session during sign-out"),
        }
    }

    (
        jar.remove(removal_cookie()),
        Json(SessionStatusResponse { status: "signedOut" }),
    )
}

/// GET /api/me
/// Returns the caller's mirrored user record
pub async fn me_handler(
    Extension(state_lock): Extension<SharedState>,
    user: AuthedUser,
) -> Result<Json<Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let record: Option<User> = sqlx::query_as::<_, User>(
        "SELECT id, name, email, email_verified, image, created_at, updated_at FROM user WHERE id = ?",
    )
    .bind(&user.id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let body = match record {
        Some(record) => serde_json::to_value(record),
        None => serde_json::to_value(SessionUserResponse {
            id: user.id,
            email: user.email,
        }),
    }
    .map_err(|e| ApiError::InternalServer(e.to_string()))?;

    Ok(Json(body))
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_info_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1, 10.0.0.2"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.9.9.9"));
        headers.insert(USER_AGENT, HeaderValue::from_static("test-agent"));

        let info = client_info(&headers);
        assert_eq!(info.ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(info.user_agent.as_deref(), Some("test-agent"));
    }

    #[test]
    fn test_client_info_without_headers() {
        let info = client_info(&HeaderMap::new());
        assert!(info.ip_address.is_none());
        assert!(info.user_agent.is_none());
    }
}
