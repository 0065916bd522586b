mod auth;
mod config;
mod handler;
mod transform;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use feature_core::{
    AuthClient, Backend, IdentityProvider, ObjectStore, RestLedger, StorageClient,
    TransformationService, USAGE_LOG_TABLE, UsageLedger,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// リクエストごとに複製される協調オブジェクト一式
///
/// クライアントは起動時に一度だけ作り、すべてのリクエストで共有する。
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub ledger: Arc<dyn UsageLedger>,
    pub transformer: Arc<dyn TransformationService>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let backend = Backend::new(
            client.clone(),
            config.supabase_url.clone(),
            config.service_role_key.clone(),
        );

        let store: Arc<dyn ObjectStore> =
            Arc::new(StorageClient::new(backend.clone(), config.bucket.clone()));
        let transformer =
            transform::build_transformer(&config.transformation, client, store.clone());

        Ok(Self {
            store,
            identity: Arc::new(AuthClient::new(backend.clone())),
            ledger: Arc::new(RestLedger::new(backend, USAGE_LOG_TABLE)),
            transformer,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handler::process_image).options(handler::preflight))
        .route("/process-image", post(handler::process_image).options(handler::preflight))
        .route("/health", get(handler::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(config = ?config, "configuration loaded");

    let state = AppState::from_config(&config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
