// src/common/migrations.rs
//! Database schema management
//!
//! Creates the `user`, `session`, `account`, `verification` and `todos`
//! tables with the indexes the handlers query through. Every statement is
//! idempotent, so this runs on each startup.

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

pub const TABLES: [&str; 5] = ["user", "session", "account", "verification", "todos"];

/// Run all database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Only drop tables if RESET_DB environment variable is set to "true"
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("RESET_DB=true - dropping all tables and recreating schema");
        drop_all_tables(pool).await?;
    }

    create_identity_tables(pool).await?;
    create_todo_tables(pool).await?;
    create_indexes(pool).await?;

    info!(tables = ?TABLES, "Database migration completed");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Reverse dependency order
    for table in ["todos", "verification", "account", "session", "user"] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// Tables owned by the identity side of the app. Rows are mirrored from
/// verified provider claims; handlers never edit them directly.
async fn create_identity_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user (
            id TEXT PRIMARY KEY,
            name TEXT,
            email TEXT,
            email_verified INTEGER NOT NULL DEFAULT 0,
            image TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS session (
            id TEXT PRIMARY KEY,
            token TEXT NOT NULL,
            user_id TEXT NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            expires_at TEXT NOT NULL,
            ip_address TEXT,
            user_agent TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS account (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            account_id TEXT NOT NULL,
            provider_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS verification (
            id TEXT PRIMARY KEY,
            identifier TEXT NOT NULL,
            value TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_todo_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todos (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_user_email ON user(email)",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_session_token ON session(token)",
        "CREATE INDEX IF NOT EXISTS idx_session_user_id ON session(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_session_expires_at ON session(expires_at)",
        "CREATE INDEX IF NOT EXISTS idx_account_user_id ON account(user_id)",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_account_provider ON account(provider_id, account_id)",
        "CREATE INDEX IF NOT EXISTS idx_verification_identifier ON verification(identifier)",
        "CREATE INDEX IF NOT EXISTS idx_verification_expires_at ON verification(expires_at)",
        "CREATE INDEX IF NOT EXISTS idx_todos_user_created ON todos(user_id, created_at DESC)",
    ];

    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}
