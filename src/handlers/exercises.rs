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
use crate::models::{ExerciseEntry, NewExercise};

/// `GET /exercises[?date=D | ?startDate=A&endDate=B]`
pub async fn list_exercises(
  State(state): State<Arc<AppState>>,
  Query(query): Query<DateQuery>,
) -> Result<Json<Vec<ExerciseEntry>>, AppError> {
  let rows = daily::list_exercises(&state.db, query.into()).await?;
  Ok(Json(rows))
}

/// `POST /exercises` replaces whatever was logged for that date
pub async fn save_exercise(
  State(state): State<Arc<AppState>>,
  JsonOrForm(entry): JsonOrForm<NewExercise>,
) -> Result<(StatusCode, Json<Created>), AppError> {
  let id = daily::save_exercise(&state.db, &entry).await?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}
