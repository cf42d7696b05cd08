//! HTTP server assembly and startup.

use std::sync::Arc;

use tracing::info;

use crate::api::{create_router, ApiState, RestApiConfig};
use crate::config::Config;
use crate::error::Result;
use crate::event::IngestionPipeline;
use crate::store::JsonFileStore;

/// Open the store, wire the pipeline, and serve the REST API until the
/// process is stopped.
pub async fn run_server(config: Config) -> Result<()> {
    let store = Arc::new(JsonFileStore::open(config.store_path()).await?);
    let pipeline = IngestionPipeline::new(store.clone());
    let state = Arc::new(ApiState::new(pipeline, store));

    let rest_config = RestApiConfig {
        enable_cors: config.server.enable_cors,
        cors_origins: config.server.cors_origins.clone(),
        ..Default::default()
    };
    let router = create_router(state, &rest_config);

    let addr = format!("{}:{}", config.server.bind_addr, config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router).await?;

    Ok(())
}
