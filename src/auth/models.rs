//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Claims carried by the signed session cookie
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionClaims {
    /// User id (identity-provider uid)
    pub sub: String,
    /// Token of the backing `session` row
    pub sid: String,
    pub email: Option<String>,
    pub iat: usize,
    pub exp: usize,
}

/// Caller identity attached to a request by the session gate
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub email: Option<String>,
}

/// User database model
#[derive(FromRow, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Request metadata recorded on the session row
#[derive(Debug, Default, Clone)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct SessionStatusResponse {
    pub status: &'static str,
}

/// `GET /api/me` body when the user row has not been mirrored yet
#[derive(Serialize, Debug)]
pub struct SessionUserResponse {
    pub id: String,
    pub email: Option<String>,
}
