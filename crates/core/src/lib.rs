//! `ripple-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod pagination;

pub use error::{DomainError, DomainResult, FieldIssue, ValidationError};
pub use id::{CommentId, PostId, UserId};
pub use pagination::{PaginationWindow, EMBEDDED_COMMENTS_LIMIT, EMBEDDED_POSTS_LIMIT};
