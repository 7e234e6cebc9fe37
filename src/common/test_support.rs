//! Shared fixtures for the in-crate test modules

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use reqwest::Client;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;

use super::dev_mode::DevModeConfig;
use super::migrations::run_migrations;
use super::state::{AppState, SharedState};
use crate::app::build_router;
use crate::auth::session::SessionService;
use crate::services::{AssistantService, IdentityError, IdentityProvider, VerifiedIdentity};

pub const TEST_SECRET: &str = "test_session_secret";

/// Token the stub provider treats as "key endpoint unreachable"
pub const UNREACHABLE_PROVIDER_TOKEN: &str = "provider-down";

/// A single-connection in-memory database. One connection matters: every
/// new `:memory:` connection would otherwise see an empty database.
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").expect("memory url");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("open in-memory sqlite");
    run_migrations(&pool).await.expect("run migrations");
    pool
}

pub fn identity(uid: &str, email: &str) -> VerifiedIdentity {
    VerifiedIdentity {
        uid: uid.to_string(),
        email: Some(email.to_string()),
        email_verified: true,
        name: None,
        picture: None,
    }
}

/// Accepts `id-token-<uid>` for every uid it was built with
pub struct StubIdentityProvider {
    identities: HashMap<String, VerifiedIdentity>,
}

impl StubIdentityProvider {
    pub fn with_users(users: &[(&str, &str)]) -> Self {
        let identities = users
            .iter()
            .map(|(uid, email)| (format!("id-token-{}", uid), identity(uid, email)))
            .collect();
        Self { identities }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn verify_id_token(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        if id_token == UNREACHABLE_PROVIDER_TOKEN {
            return Err(IdentityError::KeyFetch("connection refused".to_string()));
        }
        self.identities
            .get(id_token)
            .cloned()
            .ok_or_else(|| IdentityError::InvalidToken("unknown token".to_string()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: SharedState,
    pub db: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_assistant("http://127.0.0.1:1/").await
    }

    pub async fn with_assistant(assistant_url: &str) -> Self {
        let db = memory_pool().await;
        let http = Client::new();
        let state = AppState {
            db: db.clone(),
            cookie_secure: true,
            dev_mode: DevModeConfig::default(),
            identity: Arc::new(StubIdentityProvider::with_users(&[
                ("alice", "alice@uni.edu"),
                ("bob", "bob@uni.edu"),
            ])),
            sessions: SessionService::new(db.clone(), TEST_SECRET),
            assistant: AssistantService::new(assistant_url, http),
        };
        let state = Arc::new(RwLock::new(state));
        let router = build_router(state.clone(), &["http://localhost:5173".to_string()]);

        Self { router, state, db }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Signs in through the session endpoint and returns a `Cookie` header value
    pub async fn login(&self, uid: &str) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/auth/session",
                None,
                serde_json::json!({ "token": format!("id-token-{}", uid) }),
            ))
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.text);

        let set_cookie = response
            .headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("session cookie set");
        set_cookie
            .split(';')
            .next()
            .expect("cookie pair")
            .to_string()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }
}

pub fn request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("valid request")
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("valid request")
}
