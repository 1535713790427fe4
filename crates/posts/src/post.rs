use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use ripple_comments::CommentView;
use ripple_core::{PostId, UserId, ValidationError};
use ripple_users::BasicUser;

/// Stored post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Response projection with the author and, optionally, comments embedded.
    pub fn view(&self, author: BasicUser, comments: Option<Vec<CommentView>>) -> PostView {
        PostView {
            id: self.id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            published: self.published,
            created_at: self.created_at,
            updated_at: self.updated_at,
            author,
            comments,
        }
    }
}

/// Response shape for a post with minimal author details and nested comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: PostId,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: BasicUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,
}

/// Validated input for creating a post, linked to its author.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    #[validate(length(min = 1, message = "below minimum length"))]
    pub title: String,
    pub content: Option<String>,
    pub published: Option<bool>,
    pub author_id: UserId,
}

impl CreatePost {
    pub fn parse(value: serde_json::Value) -> Result<Self, ValidationError> {
        let input: Self = serde_json::from_value(value)
            .map_err(|e| ValidationError::single("body", e.to_string()))?;
        input.validate()?;
        Ok(input)
    }
}

/// Validated input for a partial post update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdatePost {
    #[validate(length(min = 1, message = "below minimum length"))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

impl UpdatePost {
    pub fn parse(value: serde_json::Value) -> Result<Self, ValidationError> {
        let input: Self = serde_json::from_value(value)
            .map_err(|e| ValidationError::single("body", e.to_string()))?;
        input.validate()?;
        Ok(input)
    }
}
