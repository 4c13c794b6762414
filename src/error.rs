use axum::{
  extract::multipart::MultipartError,
  extract::rejection::{FormRejection, JsonRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};

use crate::config::ConfigError;

/// Errors surfaced to HTTP clients
#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Database(#[from] sqlx::Error),

  #[error("{0}")]
  Io(#[from] std::io::Error),
}

impl AppError {
  pub fn status(&self) -> StatusCode {
    match self {
      AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Database(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<JsonRejection> for AppError {
  fn from(rejection: JsonRejection) -> Self {
    AppError::BadRequest(rejection.body_text())
  }
}

impl From<FormRejection> for AppError {
  fn from(rejection: FormRejection) -> Self {
    AppError::BadRequest(rejection.body_text())
  }
}

impl From<MultipartError> for AppError {
  fn from(e: MultipartError) -> Self {
    AppError::BadRequest(e.to_string())
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("{}", self);
    }

    (status, self.to_string()).into_response()
  }
}

/// Errors that abort startup before the listener is bound
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
  #[error("Configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}
