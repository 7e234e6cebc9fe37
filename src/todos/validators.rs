use super::models::{CreateTodoRequest, TodoPatch};
use crate::common::{ApiError, ValidationResult, Validator};

pub const MAX_TITLE_CHARS: usize = 500;

fn check_title(result: &mut ValidationResult, title: &str, empty_message: &str) {
    if title.trim().is_empty() {
        result.add_error("title", empty_message);
    } else if title.trim().chars().count() > MAX_TITLE_CHARS {
        result.add_error("title", "Title must not exceed 500 characters");
    }
}

impl Validator for CreateTodoRequest {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        match &self.title {
            Some(title) => check_title(&mut result, title, "Title is required"),
            None => result.add_error("title", "Title is required"),
        }

        result
    }
}

impl Validator for TodoPatch {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.is_empty() {
            result.add_error("body", "No valid fields to update");
        }

        if let Some(title) = &self.title {
            check_title(&mut result, title, "Title cannot be empty");
        }

        result
    }
}

/// `limit` query parameter: absent, empty or `0` mean no cap
pub fn parse_limit(raw: Option<&str>) -> Result<Option<u32>, ApiError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };

    let limit = raw.parse::<u32>().map_err(|_| {
        ApiError::ValidationError("limit must be a non-negative integer".to_string())
    })?;

    Ok((limit > 0).then_some(limit))
}
