use axum::Router;

pub mod system;
pub mod users;

/// Router for everything mounted under `/api`.
pub fn router() -> Router {
    Router::new().nest("/users", users::router())
}
