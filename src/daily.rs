//! Date-keyed daily records: exercises and step counts
//!
//! Each calendar day holds at most one exercise entry and one steps entry.
//! Writes supersede whatever was stored for that day. The unique index on
//! `date` lets `INSERT OR REPLACE` do the delete and insert as one atomic
//! statement, and the replacement row receives a fresh id.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::models::{ExerciseEntry, NewExercise, NewSteps, StepEntry};

// ---------------------------------------------------------------------------
/// Date Filter: which days a listing covers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
  #[default]
  All,
  Day(NaiveDate),
  /// Inclusive on both ends; a missing bound is open
  Range {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
  },
}

/// Query string accepted by the listing endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateQuery {
  #[serde(default, deserialize_with = "empty_as_none")]
  pub date: Option<NaiveDate>,
  #[serde(default, deserialize_with = "empty_as_none")]
  pub start_date: Option<NaiveDate>,
  #[serde(default, deserialize_with = "empty_as_none")]
  pub end_date: Option<NaiveDate>,
}

/// `?date=` means no filter, not a malformed date
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw: Option<String> = Option::deserialize(deserializer)?;
  match raw.as_deref().map(str::trim) {
    None | Some("") => Ok(None),
    Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
  }
}

impl From<DateQuery> for DateFilter {
  fn from(q: DateQuery) -> Self {
    match (q.date, q.start_date, q.end_date) {
      (Some(day), _, _) => DateFilter::Day(day),
      (None, None, None) => DateFilter::All,
      (None, start, end) => DateFilter::Range { start, end },
    }
  }
}

impl DateFilter {
  fn bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
    match *self {
      DateFilter::All => (None, None),
      DateFilter::Day(day) => (Some(day), Some(day)),
      DateFilter::Range { start, end } => (start, end),
    }
  }
}

// ---------------------------------------------------------------------------
// Exercises
// ---------------------------------------------------------------------------

/// Newest date first; entries for one day are ordered by id, newest first
pub async fn list_exercises(
  pool: &SqlitePool,
  filter: DateFilter,
) -> Result<Vec<ExerciseEntry>, sqlx::Error> {
  let (start, end) = filter.bounds();

  sqlx::query_as::<_, ExerciseEntry>(
    r#"
    SELECT id, done, date, quantity
    FROM exercises
    WHERE (?1 IS NULL OR date >= ?1)
      AND (?2 IS NULL OR date <= ?2)
    ORDER BY date DESC, id DESC
    "#,
  )
  .bind(start)
  .bind(end)
  .fetch_all(pool)
  .await
}

/// Replace the exercise entry for `entry.date`, returning the new id
pub async fn save_exercise(pool: &SqlitePool, entry: &NewExercise) -> Result<i64, sqlx::Error> {
  let result = sqlx::query(
    "INSERT OR REPLACE INTO exercises (done, quantity, date) VALUES (?1, ?2, ?3)",
  )
  .bind(&entry.done)
  .bind(entry.quantity)
  .bind(entry.date)
  .execute(pool)
  .await?;

  Ok(result.last_insert_rowid())
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

pub async fn list_steps(
  pool: &SqlitePool,
  filter: DateFilter,
) -> Result<Vec<StepEntry>, sqlx::Error> {
  let (start, end) = filter.bounds();

  sqlx::query_as::<_, StepEntry>(
    r#"
    SELECT id, date, quantity, comments
    FROM steps
    WHERE (?1 IS NULL OR date >= ?1)
      AND (?2 IS NULL OR date <= ?2)
    ORDER BY date DESC, id DESC
    "#,
  )
  .bind(start)
  .bind(end)
  .fetch_all(pool)
  .await
}

/// Replace the steps entry for `entry.date`, returning the new id
pub async fn save_steps(pool: &SqlitePool, entry: &NewSteps) -> Result<i64, sqlx::Error> {
  let result = sqlx::query(
    "INSERT OR REPLACE INTO steps (quantity, date, comments) VALUES (?1, ?2, ?3)",
  )
  .bind(entry.quantity)
  .bind(entry.date)
  .bind(&entry.comments)
  .execute(pool)
  .await?;

  Ok(result.last_insert_rowid())
}

// ---------------------------------------------------------------------------
// Transaction-scoped building blocks (used by batch sync and history wipe)
// ---------------------------------------------------------------------------

pub(crate) async fn delete_exercise_on(
  tx: &mut Transaction<'_, Sqlite>,
  date: NaiveDate,
) -> Result<u64, sqlx::Error> {
  let result = sqlx::query("DELETE FROM exercises WHERE date = ?1")
    .bind(date)
    .execute(&mut **tx)
    .await?;
  Ok(result.rows_affected())
}

pub(crate) async fn insert_exercise(
  tx: &mut Transaction<'_, Sqlite>,
  done: &str,
  quantity: Option<i64>,
  date: NaiveDate,
) -> Result<i64, sqlx::Error> {
  let result = sqlx::query("INSERT INTO exercises (done, quantity, date) VALUES (?1, ?2, ?3)")
    .bind(done)
    .bind(quantity)
    .bind(date)
    .execute(&mut **tx)
    .await?;
  Ok(result.last_insert_rowid())
}

pub(crate) async fn delete_steps_on(
  tx: &mut Transaction<'_, Sqlite>,
  date: NaiveDate,
) -> Result<u64, sqlx::Error> {
  let result = sqlx::query("DELETE FROM steps WHERE date = ?1")
    .bind(date)
    .execute(&mut **tx)
    .await?;
  Ok(result.rows_affected())
}

pub(crate) async fn insert_steps(
  tx: &mut Transaction<'_, Sqlite>,
  quantity: i64,
  date: NaiveDate,
  comments: Option<&str>,
) -> Result<i64, sqlx::Error> {
  let result = sqlx::query("INSERT INTO steps (quantity, date, comments) VALUES (?1, ?2, ?3)")
    .bind(quantity)
    .bind(date)
    .bind(comments)
    .execute(&mut **tx)
    .await?;
  Ok(result.last_insert_rowid())
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearedHistory {
  pub exercises_deleted: u64,
  pub steps_deleted: u64,
}

/// Delete every exercise and steps entry. Videos are not history.
pub async fn clear_history(pool: &SqlitePool) -> Result<ClearedHistory, sqlx::Error> {
  let mut tx = pool.begin().await?;

  let exercises = sqlx::query("DELETE FROM exercises").execute(&mut *tx).await?;
  let steps = sqlx::query("DELETE FROM steps").execute(&mut *tx).await?;

  tx.commit().await?;

  Ok(ClearedHistory {
    exercises_deleted: exercises.rows_affected(),
    steps_deleted: steps.rows_affected(),
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
