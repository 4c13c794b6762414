mod config;
mod daily;
mod db;
mod error;
mod handlers;
mod media;
mod models;
mod sync;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use error::{AppError, StartupError};

use db::AppState;
use media::VideoStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

fn init_logging() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
  // A second init (e.g. from an embedding binary) is harmless
  let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load configuration, open the store and serve until ctrl-c
pub async fn run() -> Result<(), StartupError> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();
  init_logging();

  let config = Config::from_env()?;

  let pool = db::initialize_db(&config.database_path).await?;

  let videos = VideoStore::new(&config.upload_dir);
  videos.ensure_dir().await?;

  let state = Arc::new(AppState { db: pool.clone(), videos });
  let app = handlers::build_router(state, &config);

  let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
  let listener = TcpListener::bind(addr).await?;

  info!("Rehab log listening at http://localhost:{}", config.port);
  info!("Database path: {}", config.database_path.display());
  info!("Upload destination: {}", config.upload_dir.display());

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  pool.close().await;
  info!("Shut down cleanly");

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("Failed to listen for shutdown signal: {}", e);
    std::future::pending::<()>().await;
  }
}
