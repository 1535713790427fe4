//! `ripple-posts` — the Post entity: stored record, response projection with
//! embedded author/comments, and validated input shapes.

pub mod post;

pub use post::{CreatePost, Post, PostView, UpdatePost};
