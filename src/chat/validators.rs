use super::models::{ChatRequest, MAX_QUERY_CHARS};
use crate::common::{ValidationResult, Validator};

impl Validator for ChatRequest {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        match self.query.as_deref() {
            None | Some("") => result.add_error("query", "Query is required"),
            Some(query) if query.encode_utf16().count() > MAX_QUERY_CHARS => {
                result.add_error("query", "Query too long (max 2000 characters)")
            }
            Some(_) => {}
        }

        result
    }
}
