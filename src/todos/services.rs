use super::models::{Todo, TodoPatch};
use crate::common::helpers::now_timestamp;
use crate::common::{generate_todo_id, ApiError};
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Todo persistence. Every query carries the owner filter, so a caller can
/// only ever see or touch rows whose `user_id` is their own.
pub struct TodosService {
    db: SqlitePool,
}

impl TodosService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Newest first; equal timestamps fall back to insertion order
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Todo>, ApiError> {
        // SQLite treats a negative LIMIT as "no limit"
        let sql_limit = limit.map(i64::from).unwrap_or(-1);

        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, user_id, title, completed, created_at
            FROM todos
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(sql_limit)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(todos)
    }

    /// Stores a validated title (trimmed) as a new, incomplete todo
    pub async fn create(&self, user_id: &str, title: &str) -> Result<Todo, ApiError> {
        let todo = Todo {
            id: generate_todo_id(),
            user_id: user_id.to_string(),
            title: title.trim().to_string(),
            completed: false,
            created_at: now_timestamp(),
        };

        sqlx::query(
            "INSERT INTO todos (id, user_id, title, completed, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&todo.id)
        .bind(&todo.user_id)
        .bind(&todo.title)
        .bind(todo.completed)
        .bind(&todo.created_at)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        info!(todo_id = %todo.id, user_id = %user_id, "Created todo");

        Ok(todo)
    }

    /// Applies a validated patch; returns the number of rows changed (0 or 1)
    pub async fn update(
        &self,
        user_id: &str,
        todo_id: &str,
        patch: &TodoPatch,
    ) -> Result<u64, ApiError> {
        let title = patch.title.as_deref().map(str::trim);

        let result = sqlx::query(
            r#"
            UPDATE todos
            SET completed = COALESCE(?, completed),
                title = COALESCE(?, title)
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(patch.completed)
        .bind(title)
        .bind(todo_id)
        .bind(user_id)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        debug!(
            todo_id = %todo_id,
            user_id = %user_id,
            matched = result.rows_affected(),
            "Applied todo patch"
        );

        Ok(result.rows_affected())
    }

    /// Returns the number of rows removed (0 or 1)
    pub async fn delete(&self, user_id: &str, todo_id: &str) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
            .bind(todo_id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        debug!(
            todo_id = %todo_id,
            user_id = %user_id,
            removed = result.rows_affected(),
            "Deleted todo"
        );

        Ok(result.rows_affected())
    }
}
