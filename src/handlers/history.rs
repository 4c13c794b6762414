//! Bulk operations over the daily log: calendar batch sync and history wipe

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::Value;
use tracing::{info, warn};

use super::ApiJson;
use crate::daily;
use crate::db::AppState;
use crate::error::AppError;
use crate::sync::{self, BatchEntry, BatchOutcome};

/// `POST /batch-save-data`: all entries commit together or not at all
pub async fn batch_save_data(
  State(state): State<Arc<AppState>>,
  ApiJson(body): ApiJson<Value>,
) -> Result<Json<BatchOutcome>, AppError> {
  if !body.is_array() {
    return Err(AppError::BadRequest(
      "Request body must be an array of entries".to_string(),
    ));
  }
  let entries: Vec<BatchEntry> = serde_json::from_value(body)
    .map_err(|e| AppError::BadRequest(format!("Invalid batch entry: {}", e)))?;

  let outcome = sync::save_batch(&state.db, &entries).await?;
  info!("Batch sync applied {} entries", outcome.saved);

  Ok(Json(outcome))
}

/// `DELETE /history`: wipes every exercise and steps entry, no undo
pub async fn clear_history(State(state): State<Arc<AppState>>) -> Result<&'static str, AppError> {
  let cleared = daily::clear_history(&state.db).await?;
  warn!(
    "History cleared: {} exercise and {} steps entries deleted",
    cleared.exercises_deleted, cleared.steps_deleted
  );
  Ok("History cleared.")
}
