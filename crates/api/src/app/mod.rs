//! HTTP application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: data-access functions over the injected store
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request-side query/body shapes
//! - `errors.rs`: the single place failures become HTTP responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use ripple_infra::Store;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router around an explicit store capability
/// (public entrypoint used by `main.rs` and the integration tests).
pub fn build_app(store: Arc<dyn Store>) -> Router {
    let services = Arc::new(services::AppServices::new(store));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router())
        .layer(Extension(services))
}
