use std::sync::Arc;

use ripple_infra::{InMemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ripple_observability::init();

    let store: Arc<dyn Store> = match std::env::var("DATABASE_URL") {
        Ok(url) => Arc::new(PgStore::connect(&url).await?),
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is not persisted)");
            Arc::new(InMemoryStore::new())
        }
    };

    let app = ripple_api::app::build_app(store);

    let addr = std::env::var("RIPPLE_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listen address");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await?;
    Ok(())
}
