use serde::Serialize;

use crate::types::RecordId;

/// A single inline form failure, shown next to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Failure for a required field left blank.
    pub fn required(field: &str) -> Self {
        Self::new(field, format!("{field} is required"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: RecordId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid form: {}", join_field_errors(.0))]
    InvalidForm(Vec<FieldError>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Field errors carried by an [`CoreError::InvalidForm`], empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::InvalidForm(errors) => errors,
            _ => &[],
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_form_message_lists_every_field() {
        let err = CoreError::InvalidForm(vec![
            FieldError::required("start_date"),
            FieldError::required("end_date"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("start_date is required"));
        assert!(msg.contains("end_date is required"));
        assert_eq!(err.field_errors().len(), 2);
    }

    #[test]
    fn non_form_errors_have_no_field_errors() {
        let err = CoreError::NotFound { entity: "job", id: 9 };
        assert!(err.field_errors().is_empty());
        assert_eq!(err.to_string(), "Entity not found: job with id 9");
    }
}
