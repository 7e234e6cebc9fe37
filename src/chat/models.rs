use serde_json::Value;

/// Measured in UTF-16 code units, as browsers count string length
pub const MAX_QUERY_CHARS: usize = 2000;

/// Body of `POST /api/chat`
#[derive(Debug)]
pub struct ChatRequest {
    pub query: Option<String>,
}

impl ChatRequest {
    pub fn from_json(body: &Value) -> Self {
        Self {
            query: body.get("query").and_then(Value::as_str).map(str::to_string),
        }
    }
}
