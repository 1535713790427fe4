//! `ripple-users` — the User entity: stored record, response projections,
//! and validated input shapes.

pub mod user;

pub use user::{BasicUser, CreateUser, UpdateUser, User, UserView};
