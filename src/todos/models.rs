use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Row in the `todos` table
#[derive(Debug, Clone, FromRow)]
pub struct Todo {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
}

/// Wire shape of a todo. The owner id never leaves the server.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            completed: todo.completed,
            created_at: todo.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListTodosQuery {
    pub limit: Option<String>,
}

/// Body of `POST /api/todos`. A title of the wrong JSON type reads as absent.
#[derive(Debug)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
}

impl CreateTodoRequest {
    pub fn from_json(body: &Value) -> Self {
        Self {
            title: body.get("title").and_then(Value::as_str).map(str::to_string),
        }
    }
}

/// Body of `PATCH /api/todos/:id`; only correctly typed fields are kept
#[derive(Debug, Default, PartialEq)]
pub struct TodoPatch {
    pub completed: Option<bool>,
    pub title: Option<String>,
}

impl TodoPatch {
    pub fn from_json(body: &Value) -> Self {
        Self {
            completed: body.get("completed").and_then(Value::as_bool),
            title: body.get("title").and_then(Value::as_str).map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_none() && self.title.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}
