use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use ripple_core::{CommentId, PostId, UserId, ValidationError};
use ripple_users::BasicUser;

/// Stored comment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub post_id: PostId,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Response projection with the author embedded.
    pub fn view(&self, author: BasicUser) -> CommentView {
        CommentView {
            id: self.id.clone(),
            content: self.content.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            author,
        }
    }
}

/// Response shape for a comment with minimal author details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: CommentId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: BasicUser,
}

/// Validated input for creating a comment, linked to its post and author.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    #[validate(length(min = 1, message = "below minimum length"))]
    pub content: String,
    pub author_id: UserId,
    pub post_id: PostId,
}

impl CreateComment {
    pub fn parse(value: serde_json::Value) -> Result<Self, ValidationError> {
        let input: Self = serde_json::from_value(value)
            .map_err(|e| ValidationError::single("body", e.to_string()))?;
        input.validate()?;
        Ok(input)
    }
}

/// Validated input for a partial comment update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateComment {
    #[validate(length(min = 1, message = "below minimum length"))]
    pub content: Option<String>,
}

impl UpdateComment {
    pub fn parse(value: serde_json::Value) -> Result<Self, ValidationError> {
        let input: Self = serde_json::from_value(value)
            .map_err(|e| ValidationError::single("body", e.to_string()))?;
        input.validate()?;
        Ok(input)
    }
}
