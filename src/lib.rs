pub mod api;
pub mod classify;
pub mod config;
pub mod db;
pub mod geocode;
pub mod models;
pub mod pipeline;
pub mod translate;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{AppState, ServerError};
use crate::config::{AppConfig, ConfigError};
use crate::db::{DatabaseError, DebrisStore};
use crate::pipeline::{PipelineError, SubmissionPipeline};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Startup error: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("Cannot start async runtime: {0}")]
    Runtime(std::io::Error),
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Start the reporter and block until Ctrl-C.
///
/// The blocking HTTP clients inside the pipeline are built and dropped on
/// this thread, outside the async runtime.
pub fn run() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    let store = Arc::new(DebrisStore::open(&config.database_path)?);
    let pipeline = Arc::new(SubmissionPipeline::from_config(&config, store.clone())?);
    let state = AppState::new(pipeline, store);

    tracing::info!(
        database = %config.database_path.display(),
        uploads = %config.upload_dir.display(),
        geocode_cache = %config.geocode_cache_path.display(),
        "Storage ready"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    let served = runtime.block_on(serve_until_interrupted(state.clone(), config.bind_addr));
    drop(runtime);
    drop(state);
    served
}

async fn serve_until_interrupted(state: AppState, addr: SocketAddr) -> Result<(), AppError> {
    let mut server = api::start_server(state, addr).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
    }

    server.shutdown();
    server.wait().await?;
    Ok(())
}
