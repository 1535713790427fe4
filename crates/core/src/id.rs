//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are opaque strings on the wire (the HTTP surface treats path
//! and query ids as raw strings; an unknown id is a lookup miss, never a
//! parse error). Freshly generated ids are UUIDv7 strings, so creation order
//! roughly sorts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of a post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

/// Identifier of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

macro_rules! impl_string_id {
    ($t:ty) => {
        impl $t {
            /// Generate a fresh identifier (UUIDv7, time-ordered).
            ///
            /// Prefer passing ids explicitly in tests for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_string_id!(UserId);
impl_string_id!(PostId);
impl_string_id!(CommentId);
