// src/common/seed.rs
//! Local mock data: one student account with a handful of todos.
//! Run with `api --seed`; never invoked on a normal startup.

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tracing::info;

use super::dev_mode::{DevModeConfig, DEV_USER_ID};
use super::helpers::{format_timestamp, now_timestamp};
use super::id_generator::{generate_account_id, generate_todo_id};

/// (title, completed, hours ago)
const MOCK_TODOS: [(&str, bool, i64); 5] = [
    ("Complete Data Structures assignment", false, 1),
    ("Review lecture notes for Operating Systems", false, 2),
    ("Submit math homework", true, 24),
    ("Prepare for AI/ML quiz", false, 48),
    ("Team meeting for capstone project", true, 72),
];

pub fn seed_requested<I>(args: I) -> bool
where
    I: IntoIterator<Item = String>,
{
    args.into_iter().any(|arg| arg == "--seed")
}

/// Upserts the development user and its credential account link
pub async fn ensure_dev_user(pool: &SqlitePool, dev: &DevModeConfig) -> Result<(), sqlx::Error> {
    let now = now_timestamp();

    sqlx::query("UPDATE user SET email = NULL WHERE email = ? AND id <> ?")
        .bind(&dev.user_email)
        .bind(DEV_USER_ID)
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO user (id, name, email, email_verified, image, created_at, updated_at)
        VALUES (?, ?, ?, 1, NULL, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            email = excluded.email,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(DEV_USER_ID)
    .bind(&dev.user_name)
    .bind(&dev.user_email)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO account (id, user_id, account_id, provider_id, created_at, updated_at)
        VALUES (?, ?, ?, 'dev', ?, ?)
        ON CONFLICT(provider_id, account_id) DO NOTHING
        "#,
    )
    .bind(generate_account_id())
    .bind(DEV_USER_ID)
    .bind(DEV_USER_ID)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Inserts the mock student and todos, returning the number of todos written.
/// Todos are only inserted when the student has none yet.
pub async fn seed_mock_data(pool: &SqlitePool, dev: &DevModeConfig) -> Result<usize, sqlx::Error> {
    ensure_dev_user(pool, dev).await?;

    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos WHERE user_id = ?")
        .bind(DEV_USER_ID)
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        info!(existing, "Mock todos already present, skipping");
        return Ok(0);
    }

    let now = Utc::now();
    for (title, completed, hours_ago) in MOCK_TODOS {
        sqlx::query(
            "INSERT INTO todos (id, user_id, title, completed, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(generate_todo_id())
        .bind(DEV_USER_ID)
        .bind(title)
        .bind(completed)
        .bind(format_timestamp(now - Duration::hours(hours_ago)))
        .execute(pool)
        .await?;
    }

    info!(
        user = %dev.user_email,
        todos = MOCK_TODOS.len(),
        "Inserted mock student data"
    );

    Ok(MOCK_TODOS.len())
}
