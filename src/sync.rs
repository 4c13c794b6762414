//! Batch sync of daily entries from the calendar view
//!
//! The front end edits a span of days offline and posts them in one go. The
//! whole batch is applied in a single transaction: any failure rolls back
//! every entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::daily::{delete_exercise_on, delete_steps_on, insert_exercise, insert_steps};
use crate::models::exercise::NOT_DONE;

/// One day of the calendar as posted by the front end
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
  pub date: NaiveDate,
  #[serde(default)]
  pub exercise_done: Option<String>,
  #[serde(default)]
  pub repetitions: Option<i64>,
  #[serde(default)]
  pub steps_count: Option<i64>,
  #[serde(default)]
  pub comments: Option<String>,
}

impl BatchEntry {
  /// The exercise label to store, if the day should keep an exercise entry
  pub fn exercise_label(&self) -> Option<&str> {
    self
      .exercise_done
      .as_deref()
      .filter(|done| !done.is_empty() && *done != NOT_DONE)
  }

  /// Comments worth storing (blank text counts as none)
  pub fn comments_text(&self) -> Option<&str> {
    self.comments.as_deref().filter(|c| !c.is_empty())
  }

  pub fn has_steps(&self) -> bool {
    self.steps_count.unwrap_or(0) > 0 || self.comments_text().is_some()
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
  pub saved: usize,
  pub exercises_written: usize,
  pub steps_written: usize,
}

/// Apply every entry in order. Each day's rows are always deleted first, so an
/// entry that carries no data clears the day; later entries for the same date
/// override earlier ones.
pub async fn save_batch(pool: &SqlitePool, entries: &[BatchEntry]) -> Result<BatchOutcome, sqlx::Error> {
  let mut tx = pool.begin().await?;
  let mut outcome = BatchOutcome::default();

  for entry in entries {
    delete_exercise_on(&mut tx, entry.date).await?;
    if let Some(done) = entry.exercise_label() {
      insert_exercise(&mut tx, done, entry.repetitions, entry.date).await?;
      outcome.exercises_written += 1;
    }

    delete_steps_on(&mut tx, entry.date).await?;
    if entry.has_steps() {
      let quantity = entry.steps_count.unwrap_or(0);
      insert_steps(&mut tx, quantity, entry.date, entry.comments_text()).await?;
      outcome.steps_written += 1;
    }

    outcome.saved += 1;
  }

  // Dropping `tx` on an early return above rolls everything back
  tx.commit().await?;

  debug!(
    "Batch saved: {} entries ({} exercises, {} steps)",
    outcome.saved, outcome.exercises_written, outcome.steps_written
  );

  Ok(outcome)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
