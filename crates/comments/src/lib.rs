//! `ripple-comments` — the Comment entity and its validated input shapes.

pub mod comment;

pub use comment::{Comment, CommentView, CreateComment, UpdateComment};
