//! Store abstraction.
//!
//! The application owns no authoritative state between requests; everything
//! round-trips through a `Store`. Handlers receive the store as an explicit
//! `Arc<dyn Store>` capability, so tests can substitute the in-memory
//! implementation for the Postgres one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ripple_comments::Comment;
use ripple_core::{PaginationWindow, UserId};
use ripple_posts::{Post, PostView};
use ripple_users::{UpdateUser, User};

mod in_memory;
mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PgStore;

/// Storage-level failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The targeted row does not exist (write on a missing id).
    #[error("not found")]
    NotFound,

    /// A storage constraint was violated (e.g. duplicate email).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Anything else the backend reports.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Feed entry: a followed user with their most recent posts (and each post's
/// most recent comments) embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithPosts {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub posts: Vec<PostView>,
}

/// The persistence interface the application consumes.
///
/// Partial-update semantics: `update_user` applies only the `Some` fields of
/// the change set and bumps `updated_at`; `None` leaves the stored value
/// untouched. Writes on a missing id fail with [`StoreError::NotFound`] so
/// the caller can collapse them with its own existence pre-check.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, StoreError>;

    async fn insert_user(&self, user: User) -> Result<User, StoreError>;

    async fn update_user(&self, id: &UserId, changes: UpdateUser) -> Result<User, StoreError>;

    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError>;

    async fn insert_post(&self, post: Post) -> Result<Post, StoreError>;

    async fn insert_comment(&self, comment: Comment) -> Result<Comment, StoreError>;

    async fn insert_follow(&self, follower: &UserId, followee: &UserId)
        -> Result<(), StoreError>;

    /// The paginated list of users `user_id` follows, most-recently-updated
    /// first (ties broken by id for determinism), each with their
    /// most-recently-updated posts and comments embedded up to the fixed
    /// fan-out limits. An unknown `user_id` yields an empty page.
    async fn following_page(
        &self,
        user_id: &UserId,
        window: PaginationWindow,
    ) -> Result<Vec<UserWithPosts>, StoreError>;
}

pub(crate) fn user_with_posts(user: &User, posts: Vec<PostView>) -> UserWithPosts {
    UserWithPosts {
        id: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        image: user.image.clone(),
        created_at: user.created_at,
        updated_at: user.updated_at,
        posts,
    }
}
