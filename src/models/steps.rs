use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StepEntry {
  pub id: i64,
  pub date: NaiveDate,
  pub quantity: i64,
  pub comments: Option<String>,
}

/// For inserting a day's step count (without id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSteps {
  pub quantity: i64,
  pub date: NaiveDate,
  #[serde(default)]
  pub comments: Option<String>,
}
