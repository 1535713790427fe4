//! Domain error model.

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every failure a request can surface falls into one of these kinds; the
/// HTTP layer maps them to status codes in exactly one place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Client input failed validation.
    #[error("validation failed")]
    Validation(ValidationError),

    /// A referenced entity id does not exist.
    #[error("{entity} not found")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    /// Opaque storage-level failure. Detail is logged, never shown to clients.
    #[error("store error: {0}")]
    Store(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<ValidationError> for DomainError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// One violated field with the reason (e.g. "not a valid email").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validation failure enumerating every violated field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("validation error ({} issue(s))", issues.len())]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue::new(field, message)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut issues = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for err in field_errors {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| default_message(err.code.as_ref()));
                issues.push(FieldIssue::new(field.to_string(), message));
            }
        }
        // HashMap iteration order is arbitrary; keep issue lists deterministic.
        issues.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
        Self { issues }
    }
}

fn default_message(code: &str) -> String {
    match code {
        "email" => "not a valid email".to_string(),
        "url" => "not a valid url".to_string(),
        "length" => "below minimum length".to_string(),
        "range" => "out of range".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8))]
        password: String,
    }

    #[test]
    fn validator_errors_enumerate_every_field() {
        let probe = Probe {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let err: ValidationError = probe.validate().unwrap_err().into();
        let fields: Vec<&str> = err.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[test]
    fn not_found_messages_name_the_entity() {
        let err = DomainError::not_found("User", "u-1");
        assert_eq!(err.to_string(), "User not found");
    }
}
