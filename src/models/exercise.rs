use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Label recorded when no exercise was done that day
pub const NOT_DONE: &str = "No";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExerciseEntry {
  pub id: i64,
  pub done: String,
  pub date: NaiveDate,
  pub quantity: i64,
}

/// For inserting a day's exercise (without id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExercise {
  pub done: String,
  pub quantity: i64,
  pub date: NaiveDate,
}
