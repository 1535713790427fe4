use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use ripple_core::{UserId, ValidationError};

/// Stored user record, owned by the store.
///
/// `password` is persisted on create and never appears in any response
/// shape; the projections below are the only things handlers serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Minimal projection embedded in posts, comments, and follow lists.
    pub fn basic(&self) -> BasicUser {
        BasicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    /// Full response projection (no follow lists loaded).
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            following: None,
            followers: None,
        }
    }
}

/// Minimal user projection: enough to identify an author or follow target
/// without recursing into their own relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicUser {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
}

/// Response shape for a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following: Option<Vec<BasicUser>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<Vec<BasicUser>>,
}

/// Validated input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(email(message = "not a valid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "below minimum length"))]
    pub password: String,
    pub name: Option<String>,
    #[validate(url(message = "not a valid url"))]
    pub image: Option<String>,
}

impl CreateUser {
    /// Parse an untyped JSON body into a validated create input.
    ///
    /// Unknown fields are stripped; every violated field is reported.
    pub fn parse(value: serde_json::Value) -> Result<Self, ValidationError> {
        let input: Self = serde_json::from_value(value)
            .map_err(|e| ValidationError::single("body", e.to_string()))?;
        input.validate()?;
        Ok(input)
    }
}

/// Validated input for a partial user update.
///
/// Every field is optional; an absent field leaves the stored value
/// untouched. There is deliberately no way to update the password here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(email(message = "not a valid email"))]
    pub email: Option<String>,
    pub name: Option<String>,
    #[validate(url(message = "not a valid url"))]
    pub image: Option<String>,
}

impl UpdateUser {
    pub fn parse(value: serde_json::Value) -> Result<Self, ValidationError> {
        let input: Self = serde_json::from_value(value)
            .map_err(|e| ValidationError::single("body", e.to_string()))?;
        input.validate()?;
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn create_accepts_minimal_input() {
        let input = CreateUser::parse(json!({
            "email": "a@b.com",
            "password": "12345678",
        }))
        .unwrap();
        assert_eq!(input.email, "a@b.com");
        assert_eq!(input.name, None);
        assert_eq!(input.image, None);
    }

    #[test]
    fn create_rejects_bad_email_and_short_password_together() {
        let err = CreateUser::parse(json!({
            "email": "nope",
            "password": "short",
        }))
        .unwrap_err();
        let fields: Vec<&str> = err.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[test]
    fn create_rejects_missing_required_field() {
        let err = CreateUser::parse(json!({ "email": "a@b.com" })).unwrap_err();
        assert_eq!(err.issues[0].field, "body");
        assert!(err.issues[0].message.contains("password"));
    }

    #[test]
    fn create_strips_unknown_fields() {
        let input = CreateUser::parse(json!({
            "email": "a@b.com",
            "password": "12345678",
            "admin": true,
        }))
        .unwrap();
        assert_eq!(input.email, "a@b.com");
    }

    #[test]
    fn create_rejects_non_url_image() {
        let err = CreateUser::parse(json!({
            "email": "a@b.com",
            "password": "12345678",
            "image": "not a url",
        }))
        .unwrap_err();
        assert_eq!(err.issues[0].field, "image");
    }

    #[test]
    fn update_accepts_empty_body() {
        let input = UpdateUser::parse(json!({})).unwrap();
        assert_eq!(input, UpdateUser::default());
    }

    #[test]
    fn update_validates_present_fields_only() {
        assert!(UpdateUser::parse(json!({ "name": "Ada" })).is_ok());
        let err = UpdateUser::parse(json!({ "email": "nope" })).unwrap_err();
        assert_eq!(err.issues[0].field, "email");
    }

    #[test]
    fn update_has_no_password_field() {
        // A password key is stripped as an unknown field, not applied.
        let input = UpdateUser::parse(json!({ "password": "hunter22" })).unwrap();
        assert_eq!(input, UpdateUser::default());
    }

    #[test]
    fn view_omits_unloaded_follow_lists() {
        let user = User {
            id: "u-1".into(),
            email: "a@b.com".to_string(),
            password: "12345678".to_string(),
            name: None,
            image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(user.view()).unwrap();
        assert!(value.get("following").is_none());
        assert!(value.get("followers").is_none());
        assert_eq!(value["name"], serde_json::Value::Null);
    }

    #[test]
    fn view_round_trips_through_its_own_schema() {
        let user = User {
            id: "u-1".into(),
            email: "a@b.com".to_string(),
            password: "12345678".to_string(),
            name: Some("Ada".to_string()),
            image: Some("https://example.com/a.png".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let view = user.view();
        let value = serde_json::to_value(&view).unwrap();
        let back: UserView = serde_json::from_value(value).unwrap();
        assert_eq!(back, view);
    }

    proptest! {
        #[test]
        fn any_password_of_eight_or_more_chars_passes(pw in "[a-zA-Z0-9]{8,32}") {
            let input = CreateUser::parse(json!({
                "email": "a@b.com",
                "password": pw,
            }));
            prop_assert!(input.is_ok());
        }

        #[test]
        fn any_shorter_password_fails(pw in "[a-zA-Z0-9]{0,7}") {
            let input = CreateUser::parse(json!({
                "email": "a@b.com",
                "password": pw,
            }));
            prop_assert!(input.is_err());
        }
    }
}
