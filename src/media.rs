//! Exercise videos: files on disk plus a metadata row per upload
//!
//! Files live flat in the upload directory as `<millis>-<original name>`.
//! The millisecond prefix is forced to increase strictly within the process,
//! so two uploads of the same file in the same millisecond never collide.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use sqlx::SqlitePool;
use tokio::fs;
use tracing::{info, warn};

use crate::models::{NewVideo, VideoRecord};

/// URL prefix the upload directory is served under
pub const PUBLIC_PREFIX: &str = "/uploads";

const FALLBACK_NAME: &str = "video";

// ---------------------------------------------------------------------------
/// Video Store: the upload directory
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct VideoStore {
  root: PathBuf,
  last_stamp: AtomicI64,
}

/// What happened to the file when a video was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRemoval {
  Removed,
  AlreadyGone,
  Failed,
}

impl VideoStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      last_stamp: AtomicI64::new(0),
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Create the upload directory if it is missing
  pub async fn ensure_dir(&self) -> std::io::Result<()> {
    fs::create_dir_all(&self.root).await
  }

  fn next_stamp(&self) -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = self.last_stamp.load(Ordering::Relaxed);
    loop {
      let next = now.max(last + 1);
      match self
        .last_stamp
        .compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
      {
        Ok(_) => return next,
        Err(actual) => last = actual,
      }
    }
  }

  /// Unique stored name that keeps the client's file name as a suffix
  pub fn unique_filename(&self, original: &str) -> String {
    format!("{}-{}", self.next_stamp(), sanitize_name(original))
  }

  /// Write the upload and return its stored file name
  pub async fn store(&self, original: &str, data: &[u8]) -> std::io::Result<String> {
    self.ensure_dir().await?;
    let filename = self.unique_filename(original);
    fs::write(self.root.join(&filename), data).await?;
    Ok(filename)
  }

  /// Best-effort removal. A file that is already gone counts as success;
  /// anything else is logged and reported but never returned as an error.
  pub async fn remove(&self, filename: &str) -> FileRemoval {
    match fs::remove_file(self.root.join(filename)).await {
      Ok(()) => FileRemoval::Removed,
      Err(e) if e.kind() == ErrorKind::NotFound => FileRemoval::AlreadyGone,
      Err(e) => {
        warn!("Failed to delete video file {}: {}", filename, e);
        FileRemoval::Failed
      }
    }
  }
}

/// Only the last path component, so a crafted name cannot escape the directory
fn sanitize_name(original: &str) -> String {
  original
    .rsplit(['/', '\\'])
    .next()
    .map(str::trim)
    .filter(|name| !name.is_empty() && *name != "." && *name != "..")
    .unwrap_or(FALLBACK_NAME)
    .to_string()
}

pub fn public_path(filename: &str) -> String {
  format!("{}/{}", PUBLIC_PREFIX, filename)
}

// ---------------------------------------------------------------------------
// Database Operations
// ---------------------------------------------------------------------------

/// Newest upload first
pub async fn list_videos(pool: &SqlitePool) -> Result<Vec<VideoRecord>, sqlx::Error> {
  sqlx::query_as::<_, VideoRecord>(
    r#"
    SELECT id, title, filename, filepath, upload_date
    FROM videos
    ORDER BY upload_date DESC, id DESC
    "#,
  )
  .fetch_all(pool)
  .await
}

pub async fn find_video(pool: &SqlitePool, id: i64) -> Result<Option<VideoRecord>, sqlx::Error> {
  sqlx::query_as::<_, VideoRecord>(
    "SELECT id, title, filename, filepath, upload_date FROM videos WHERE id = ?1",
  )
  .bind(id)
  .fetch_optional(pool)
  .await
}

pub async fn insert_video(pool: &SqlitePool, video: &NewVideo) -> Result<i64, sqlx::Error> {
  let result = sqlx::query(
    r#"
    INSERT INTO videos (title, filename, filepath, upload_date)
    VALUES (?1, ?2, ?3, ?4)
    "#,
  )
  .bind(&video.title)
  .bind(&video.filename)
  .bind(&video.filepath)
  .bind(video.upload_date)
  .execute(pool)
  .await?;

  Ok(result.last_insert_rowid())
}

/// Store the file, then record it. The file is removed again if the row
/// cannot be written.
pub async fn save_upload(
  pool: &SqlitePool,
  store: &VideoStore,
  title: &str,
  original_name: &str,
  data: &[u8],
) -> Result<VideoRecord, crate::error::AppError> {
  let filename = store.store(original_name, data).await?;
  let video = NewVideo {
    title: title.to_string(),
    filepath: public_path(&filename),
    filename,
    upload_date: Utc::now().date_naive(),
  };

  match insert_video(pool, &video).await {
    Ok(id) => {
      info!("Stored video '{}' as {}", video.title, video.filename);
      Ok(VideoRecord {
        id,
        title: video.title,
        filename: video.filename,
        filepath: video.filepath,
        upload_date: video.upload_date,
      })
    }
    Err(e) => {
      store.remove(&video.filename).await;
      Err(e.into())
    }
  }
}

/// Remove the video's file and row. `None` when the id is unknown.
pub async fn delete_video(
  pool: &SqlitePool,
  store: &VideoStore,
  id: i64,
) -> Result<Option<FileRemoval>, sqlx::Error> {
  let Some(video) = find_video(pool, id).await? else {
    return Ok(None);
  };

  let removal = store.remove(&video.filename).await;

  sqlx::query("DELETE FROM videos WHERE id = ?1")
    .bind(id)
    .execute(pool)
    .await?;

  Ok(Some(removal))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
