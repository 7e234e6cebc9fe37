//! Session gate middleware
//!
//! Runs on every request: resolves the caller from the `session` cookie,
//! attaches it as a [`CurrentUser`] extension and enforces which routes an
//! anonymous caller may reach.

use axum::{
    extract::{Extension, Request},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, error, warn};

use super::models::CurrentUser;
use super::session::SessionError;
use crate::common::config::SESSION_TTL_SECS;
use crate::common::{ApiError, SharedState};

pub const SESSION_COOKIE: &str = "session";

/// Reachable without a session
pub const UNPROTECTED_ROUTES: [&str; 3] = ["/login", "/signup", "/api/auth/session"];

/// Signed-in callers are bounced from these back to `/`
pub const GUEST_ONLY_ROUTES: [&str; 2] = ["/login", "/signup"];

#[derive(Debug, PartialEq, Eq)]
pub enum GateDecision {
    Continue,
    RedirectToLogin,
    RejectApi,
    RedirectHome,
}

pub fn decide(path: &str, authenticated: bool) -> GateDecision {
    let is_protected = !UNPROTECTED_ROUTES.contains(&path);

    if is_protected && !authenticated {
        if path == "/api" || path.starts_with("/api/") {
            return GateDecision::RejectApi;
        }
        return GateDecision::RedirectToLogin;
    }

    if authenticated && GUEST_ONLY_ROUTES.contains(&path) {
        return GateDecision::RedirectHome;
    }

    GateDecision::Continue
}

pub fn session_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS))
        .build()
}

/// Matches the attributes the cookie was set with so browsers drop it
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Only a cookie we can prove is unusable gets deleted; storage errors keep it
fn cookie_is_dead(err: &SessionError) -> bool {
    matches!(err, SessionError::Invalid(_) | SessionError::Revoked)
}

pub async fn session_gate(
    Extension(state_lock): Extension<SharedState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let state = state_lock.read().await.clone();
    let path = request.uri().path().to_string();

    let mut user: Option<CurrentUser> = None;
    let mut stale_cookie = false;

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        match state.sessions.verify(cookie.value()).await {
            Ok(current) => user = Some(current),
            // Any failure means anonymous, never an error response
            Err(e) if cookie_is_dead(&e) => {
                debug!(error = %e, path = %path, "Discarding unusable session cookie");
                stale_cookie = true;
            }
            Err(e) => {
                error!(error = %e, path = %path, "Session lookup failed, keeping cookie");
            }
        }
    }

    if user.is_none() && state.dev_mode.is_enabled() {
        user = Some(state.dev_mode.dev_user());
    }

    let response = match decide(&path, user.is_some()) {
        GateDecision::Continue => {
            if let Some(current) = user {
                request.extensions_mut().insert(current);
            }
            next.run(request).await
        }
        GateDecision::RejectApi => {
            warn!(path = %path, "Rejected unauthenticated API request");
            ApiError::unauthorized().into_response()
        }
        GateDecision::RedirectToLogin => Redirect::to("/login").into_response(),
        GateDecision::RedirectHome => Redirect::to("/").into_response(),
    };

    // A handler that set its own cookie (sign-in) takes precedence
    if stale_cookie && !response.headers().contains_key(SET_COOKIE) {
        return (jar.remove(removal_cookie()), response).into_response();
    }

    response
}
