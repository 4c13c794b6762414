use std::sync::Arc;

use axum::{
  extract::{Query, State},
  http::StatusCode,
  Json,
};

use super::{Created, JsonOrForm};
use crate::daily::{self, DateQuery};
use crate::db::AppState;
use crate::error::AppError;
use crate::models::{NewSteps, StepEntry};

pub async fn list_steps(
  State(state): State<Arc<AppState>>,
  Query(query): Query<DateQuery>,
) -> Result<Json<Vec<StepEntry>>, AppError> {
  let rows = daily::list_steps(&state.db, query.into()).await?;
  Ok(Json(rows))
}

pub async fn save_steps(
  State(state): State<Arc<AppState>>,
  JsonOrForm(entry): JsonOrForm<NewSteps>,
) -> Result<(StatusCode, Json<Created>), AppError> {
  let id = daily::save_steps(&state.db, &entry).await?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}
