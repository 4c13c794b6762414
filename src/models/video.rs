use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VideoRecord {
  pub id: i64,
  pub title: String,
  pub filename: String,
  /// Public path the front end links to, e.g. `/uploads/1700000000000-squat.mp4`
  pub filepath: String,
  pub upload_date: NaiveDate,
}

/// For inserting video metadata (without id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVideo {
  pub title: String,
  pub filename: String,
  pub filepath: String,
  pub upload_date: NaiveDate,
}
