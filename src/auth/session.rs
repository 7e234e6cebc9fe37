//! Session cookie issuance, verification and revocation
//!
//! A session cookie is an HS256 token naming a row in the `session` table.
//! The signature proves we minted it; the row proves it has not been revoked
//! or expired. Deleting the row is therefore enough to sign a caller out.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sqlx::SqlitePool;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::models::{ClientInfo, CurrentUser, SessionClaims};
use crate::common::config::SESSION_TTL_SECS;
use crate::common::helpers::{format_timestamp, now_timestamp, safe_email_log};
use crate::common::{generate_account_id, generate_session_id, ApiError};
use crate::services::VerifiedIdentity;

/// Provider name recorded on `account` rows created at sign-in
pub const FIREBASE_PROVIDER: &str = "firebase";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid session token: {0}")]
    Invalid(String),

    #[error("session revoked or expired")]
    Revoked,

    #[error("could not sign session token: {0}")]
    Signing(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Invalid(_) | SessionError::Revoked => ApiError::unauthorized(),
            SessionError::Signing(msg) => ApiError::InternalServer(msg),
            SessionError::Database(e) => ApiError::DatabaseError(e),
        }
    }
}

#[derive(Debug)]
pub struct IssuedSession {
    pub user_id: String,
    pub cookie_value: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionService {
    db: SqlitePool,
    secret: String,
    ttl: Duration,
}

impl SessionService {
    pub fn new(db: SqlitePool, secret: impl Into<String>) -> Self {
        Self {
            db,
            secret: secret.into(),
            ttl: Duration::seconds(SESSION_TTL_SECS),
        }
    }

    /// Mirrors the verified identity into `user`/`account` and opens a session
    pub async fn issue(
        &self,
        identity: &VerifiedIdentity,
        client: &ClientInfo,
    ) -> Result<IssuedSession, SessionError> {
        let issued_at = Utc::now();
        let expires_at = issued_at + self.ttl;
        let now = format_timestamp(issued_at);
        let session_token = Uuid::new_v4().simple().to_string();

        let mut tx = self.db.begin().await?;

        // The verified identity owns its email; older mirrors lose it
        if let Some(email) = &identity.email {
            let released = sqlx::query("UPDATE user SET email = NULL WHERE email = ? AND id <> ?")
                .bind(email)
                .bind(&identity.uid)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            if released > 0 {
                debug!(
                    email = %safe_email_log(email),
                    user_id = %identity.uid,
                    "Released email held by another user record"
                );
            }
        }

        sqlx::query(
            r#"
            INSERT INTO user (id, name, email, email_verified, image, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = COALESCE(excluded.name, user.name),
                email = excluded.email,
                email_verified = excluded.email_verified,
                image = COALESCE(excluded.image, user.image),
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&identity.uid)
        .bind(&identity.name)
        .bind(&identity.email)
        .bind(identity.email_verified)
        .bind(&identity.picture)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO account (id, user_id, account_id, provider_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(provider_id, account_id) DO UPDATE SET updated_at = excluded.updated_at
            "#,
        )
        .bind(generate_account_id())
        .bind(&identity.uid)
        .bind(&identity.uid)
        .bind(FIREBASE_PROVIDER)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO session (id, token, user_id, expires_at, ip_address, user_agent, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(generate_session_id())
        .bind(&session_token)
        .bind(&identity.uid)
        .bind(format_timestamp(expires_at))
        .bind(&client.ip_address)
        .bind(&client.user_agent)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let claims = SessionClaims {
            sub: identity.uid.clone(),
            sid: session_token,
            email: identity.email.clone(),
            iat: issued_at.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };

        let cookie_value = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| SessionError::Signing(e.to_string()))?;

        info!(
            user_id = %identity.uid,
            email = %identity.email.as_deref().map(safe_email_log).unwrap_or_default(),
            "Session issued"
        );

        Ok(IssuedSession {
            user_id: identity.uid.clone(),
            cookie_value,
            expires_at,
        })
    }

    fn decode_claims(&self, cookie_value: &str, check_expiry: bool) -> Result<SessionClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = check_expiry;

        decode::<SessionClaims>(
            cookie_value,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| SessionError::Invalid(e.to_string()))
    }

    /// Resolves a cookie to its caller, rejecting forged, expired, or revoked sessions
    pub async fn verify(&self, cookie_value: &str) -> Result<CurrentUser, SessionError> {
        let claims = self.decode_claims(cookie_value, true)?;

        let row: Option<(String,)> =
            sqlx::query_as("SELECT user_id FROM session WHERE token = ? AND expires_at > ?")
                .bind(&claims.sid)
                .bind(now_timestamp())
                .fetch_optional(&self.db)
                .await?;

        match row {
            Some((user_id,)) if user_id == claims.sub => Ok(CurrentUser {
                id: user_id,
                email: claims.email,
            }),
            _ => {
                debug!(user_id = %claims.sub, "Session row missing or expired");
                Err(SessionError::Revoked)
            }
        }
    }

    /// Deletes the row behind a cookie. Expired cookies are still accepted
    /// here so a stale browser can always sign out.
    pub async fn revoke(&self, cookie_value: &str) -> Result<bool, SessionError> {
        let claims = self.decode_claims(cookie_value, false)?;

        let result = sqlx::query("DELETE FROM session WHERE token = ?")
            .bind(&claims.sid)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes expired `session` and `verification` rows, returning how many went
    pub async fn purge_expired(&self) -> Result<u64, sqlx::Error> {
        let now = now_timestamp();

        let sessions = sqlx::query("DELETE FROM session WHERE expires_at <= ?")
            .bind(&now)
            .execute(&self.db)
            .await?
            .rows_affected();

        let verifications = sqlx::query("DELETE FROM verification WHERE expires_at <= ?")
            .bind(&now)
            .execute(&self.db)
            .await?
            .rows_affected();

        Ok(sessions + verifications)
    }

    /// Periodically sweeps expired rows; stands in for database TTL indexes
    pub fn start_cleanup_task(self, every: std::time::Duration) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                match self.purge_expired().await {
                    Ok(0) => {}
                    Ok(removed) => info!(removed, "Purged expired sessions"),
                    Err(e) => error!(error = %e, "Expired session sweep failed"),
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{identity, memory_pool};

    async fn service() -> SessionService {
        SessionService::new(memory_pool().await, "test_session_secret")
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let sessions = service().await;
        let issued = sessions
            .issue(&identity("uid-alice", "alice@uni.edu"), &ClientInfo::default())
            .await
            .unwrap();

        let user = sessions.verify(&issued.cookie_value).await.unwrap();
        assert_eq!(user.id, "uid-alice");
        assert_eq!(user.email.as_deref(), Some("alice@uni.edu"));

        let remaining = issued.expires_at - Utc::now();
        assert!(remaining > Duration::days(4) && remaining <= Duration::days(5));
    }

    #[tokio::test]
    async fn test_issue_mirrors_user_and_account_once() {
        let sessions = service().await;
        let alice = identity("uid-alice", "alice@uni.edu");

        sessions.issue(&alice, &ClientInfo::default()).await.unwrap();
        sessions.issue(&alice, &ClientInfo::default()).await.unwrap();

        let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user")
            .fetch_one(&sessions.db)
            .await
            .unwrap();
        let (accounts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM account")
            .fetch_one(&sessions.db)
            .await
            .unwrap();
        let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM session")
            .fetch_one(&sessions.db)
            .await
            .unwrap();

        assert_eq!((users, accounts, rows), (1, 1, 2));
    }

    #[tokio::test]
    async fn test_new_uid_with_known_email_signs_in() {
        let sessions = service().await;

        sessions
            .issue(&identity("uid-old", "alice@uni.edu"), &ClientInfo::default())
            .await
            .unwrap();
        let issued = sessions
            .issue(&identity("uid-new", "alice@uni.edu"), &ClientInfo::default())
            .await
            .unwrap();

        let user = sessions.verify(&issued.cookie_value).await.unwrap();
        assert_eq!(user.id, "uid-new");

        let (owner,): (String,) = sqlx::query_as("SELECT id FROM user WHERE email = ?")
            .bind("alice@uni.edu")
            .fetch_one(&sessions.db)
            .await
            .unwrap();
        assert_eq!(owner, "uid-new");

        let (old_email,): (Option<String>,) =
            sqlx::query_as("SELECT email FROM user WHERE id = 'uid-old'")
                .fetch_one(&sessions.db)
                .await
                .unwrap();
        assert!(old_email.is_none());
    }

    #[tokio::test]
    async fn test_forged_cookie_is_invalid() {
        let sessions = service().await;
        let issued = sessions
            .issue(&identity("uid-alice", "alice@uni.edu"), &ClientInfo::default())
            .await
            .unwrap();

        let other = SessionService::new(sessions.db.clone(), "a_different_secret");
        assert!(matches!(
            other.verify(&issued.cookie_value).await,
            Err(SessionError::Invalid(_))
        ));
        assert!(matches!(
            sessions.verify("garbage").await,
            Err(SessionError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_revoked_cookie_no_longer_verifies() {
        let sessions = service().await;
        let issued = sessions
            .issue(&identity("uid-alice", "alice@uni.edu"), &ClientInfo::default())
            .await
            .unwrap();

        assert!(sessions.revoke(&issued.cookie_value).await.unwrap());
        assert!(matches!(
            sessions.verify(&issued.cookie_value).await,
            Err(SessionError::Revoked)
        ));
        assert!(!sessions.revoke(&issued.cookie_value).await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_rows_are_rejected_and_purged() {
        let sessions = service().await;
        let issued = sessions
            .issue(&identity("uid-alice", "alice@uni.edu"), &ClientInfo::default())
            .await
            .unwrap();

        sqlx::query("UPDATE session SET expires_at = '2000-01-01T00:00:00.000Z'")
            .execute(&sessions.db)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO verification (id, identifier, value, expires_at, created_at, updated_at) \
             VALUES ('v1', 'alice@uni.edu', 'code', '2000-01-01T00:00:00.000Z', 'x', 'x')",
        )
        .execute(&sessions.db)
        .await
        .unwrap();

        assert!(matches!(
            sessions.verify(&issued.cookie_value).await,
            Err(SessionError::Revoked)
        ));
        assert_eq!(sessions.purge_expired().await.unwrap(), 2);
    }
}
