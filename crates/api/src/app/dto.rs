//! Request-side shapes: query parameters and raw-body parsing.
//!
//! Query values stay raw strings here; turning them into typed values is the
//! job of the pure parse functions, which report every violated field at
//! once instead of failing on the first.

use serde::Deserialize;

use ripple_core::{FieldIssue, PaginationWindow, UserId, ValidationError};

/// Parse a request body into untyped JSON.
///
/// A malformed body is a validation failure like any other, so it flows
/// through the centralized error mapping instead of a framework rejection.
pub fn json_body(body: &str) -> Result<serde_json::Value, ValidationError> {
    serde_json::from_str(body).map_err(|e| ValidationError::single("body", format!("invalid JSON: {e}")))
}

/// Query parameters of the paginated following list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub user_id: Option<String>,
    pub skip: Option<String>,
    pub take: Option<String>,
}

impl ListUsersQuery {
    pub fn parse(self) -> Result<(UserId, PaginationWindow), ValidationError> {
        let mut issues = Vec::new();

        let user_id = match self.user_id {
            Some(id) => Some(UserId::from(id)),
            None => {
                issues.push(FieldIssue::new("userId", "required"));
                None
            }
        };

        let window = match PaginationWindow::parse(self.skip.as_deref(), self.take.as_deref()) {
            Ok(window) => Some(window),
            Err(err) => {
                issues.extend(err.issues);
                None
            }
        };

        match (user_id, window) {
            (Some(user_id), Some(window)) if issues.is_empty() => Ok((user_id, window)),
            _ => Err(ValidationError::new(issues)),
        }
    }
}

/// The `?userId=` selector used by the query-param update/delete variants.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Option<String>,
}

impl UserIdQuery {
    pub fn require(self) -> Result<UserId, ValidationError> {
        self.user_id
            .map(UserId::from)
            .ok_or_else(|| ValidationError::single("userId", "required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_reports_missing_user_id_and_bad_take_together() {
        let query = ListUsersQuery {
            user_id: None,
            skip: None,
            take: Some("0".to_string()),
        };
        let err = query.parse().unwrap_err();
        let fields: Vec<&str> = err.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["userId", "take"]);
    }

    #[test]
    fn list_query_defaults_pagination() {
        let query = ListUsersQuery {
            user_id: Some("u-1".to_string()),
            skip: None,
            take: None,
        };
        let (user_id, window) = query.parse().unwrap();
        assert_eq!(user_id, "u-1".into());
        assert_eq!(window, PaginationWindow::default());
    }

    #[test]
    fn user_id_query_is_required() {
        assert!(UserIdQuery::default().require().is_err());
    }

    #[test]
    fn malformed_json_is_a_field_issue() {
        let err = json_body("{ nope").unwrap_err();
        assert_eq!(err.issues[0].field, "body");
    }
}
