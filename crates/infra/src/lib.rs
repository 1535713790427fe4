//! `ripple-infra` — persistence: the `Store` abstraction and its
//! in-memory and Postgres implementations.

pub mod store;

pub use store::{InMemoryStore, PgStore, Store, StoreError, UserWithPosts};
