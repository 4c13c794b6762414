use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::StartupError;
use crate::media::VideoStore;

pub type DbPool = SqlitePool;

/// Application state shared by every request handler
pub struct AppState {
  pub db: DbPool,
  pub videos: VideoStore,
}

/// Open (or create) the database file and bring the schema up to date
pub async fn initialize_db(db_path: &Path) -> Result<DbPool, StartupError> {
  if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }
  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

  info!("Initializing database at: {}", db_path.display());

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  migrate(&pool).await?;

  info!("Database initialized successfully");

  Ok(pool)
}

/// Run every schema step. Safe to call on new, current or legacy data files.
pub async fn migrate(pool: &DbPool) -> Result<(), StartupError> {
  ensure_steps_comments_column(pool).await?;

  let duplicates = count_duplicate_dates(pool).await?;
  if duplicates > 0 {
    warn!(
      "Dropping {} older entries that share a date with a newer one; every other row is kept",
      duplicates
    );
  }

  sqlx::migrate!("./migrations").run(pool).await?;
  Ok(())
}

/// Rows the one-entry-per-day migration will remove: for each date in
/// `exercises` and `steps`, every row except the newest
pub async fn count_duplicate_dates(pool: &DbPool) -> Result<i64, sqlx::Error> {
  let mut total = 0;
  for table in ["exercises", "steps"] {
    let exists: i64 =
      sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")
        .bind(table)
        .fetch_one(pool)
        .await?;
    if exists == 0 {
      continue;
    }

    let duplicates: i64 =
      sqlx::query_scalar(&format!("SELECT COUNT(*) - COUNT(DISTINCT date) FROM {}", table))
        .fetch_one(pool)
        .await?;
    total += duplicates;
  }
  Ok(total)
}

/// Data files written before step comments existed have no `comments` column.
/// Adds it in place; a missing table is left for the migrations to create.
pub async fn ensure_steps_comments_column(pool: &DbPool) -> Result<bool, sqlx::Error> {
  let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('steps')")
    .fetch_all(pool)
    .await?;

  if columns.is_empty() || columns.iter().any(|c| c == "comments") {
    return Ok(false);
  }

  sqlx::query("ALTER TABLE steps ADD COLUMN comments TEXT")
    .execute(pool)
    .await?;
  info!("Added 'comments' column to 'steps' table");

  Ok(true)
}
