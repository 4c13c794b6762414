//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Seed helpers for each table
//! - An in-process HTTP client for the router

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
  body::{to_bytes, Body},
  http::{header, Method, Request, StatusCode},
  Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::Config;
use crate::db::{self, AppState};
use crate::handlers::build_router;
use crate::media::VideoStore;
use crate::models::NewExercise;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  db::migrate(&pool).await.expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

pub fn day(s: &str) -> NaiveDate {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("Invalid test date")
}

pub fn new_exercise(done: &str, quantity: i64, date: &str) -> NewExercise {
  NewExercise {
    done: done.to_string(),
    quantity,
    date: day(date),
  }
}

/// Seed one exercise entry per date ("Yes", 10 reps)
pub async fn seed_exercises(pool: &SqlitePool, dates: &[&str]) -> Vec<i64> {
  let mut ids = Vec::new();
  for date in dates {
    let result = sqlx::query("INSERT INTO exercises (done, quantity, date) VALUES ('Yes', 10, ?1)")
      .bind(day(date))
      .execute(pool)
      .await
      .expect("Failed to insert test exercise");
    ids.push(result.last_insert_rowid());
  }
  ids
}

/// Seed one steps entry per date (3000 steps, no comments)
pub async fn seed_steps(pool: &SqlitePool, dates: &[&str]) -> Vec<i64> {
  let mut ids = Vec::new();
  for date in dates {
    let result = sqlx::query("INSERT INTO steps (quantity, date) VALUES (3000, ?1)")
      .bind(day(date))
      .execute(pool)
      .await
      .expect("Failed to insert test steps");
    ids.push(result.last_insert_rowid());
  }
  ids
}

/// Seed a video row without a file on disk
pub async fn seed_video(pool: &SqlitePool, title: &str, filename: &str) -> i64 {
  sqlx::query(
    r#"
    INSERT INTO videos (title, filename, filepath, upload_date)
    VALUES (?1, ?2, ?3, '2024-01-01')
    "#,
  )
  .bind(title)
  .bind(filename)
  .bind(format!("/uploads/{}", filename))
  .execute(pool)
  .await
  .expect("Failed to insert test video")
  .last_insert_rowid()
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
  sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
    .fetch_one(pool)
    .await
    .expect("Failed to count rows")
}

/// ---------------------------------------------------------------------------
/// HTTP Test Utilities
/// ---------------------------------------------------------------------------

/// Router over an in-memory database and a temporary public/upload directory
pub struct TestApp {
  router: Router,
  state: Arc<AppState>,
  dir: TempDir,
}

pub struct MultipartPart<'a> {
  name: &'a str,
  file_name: Option<&'a str>,
  data: &'a [u8],
}

impl<'a> MultipartPart<'a> {
  pub fn text(name: &'a str, value: &'a str) -> Self {
    Self {
      name,
      file_name: None,
      data: value.as_bytes(),
    }
  }

  pub fn file(name: &'a str, file_name: &'a str, data: &'a [u8]) -> Self {
    Self {
      name,
      file_name: Some(file_name),
      data,
    }
  }
}

const BOUNDARY: &str = "rehab-log-test-boundary";

impl TestApp {
  pub async fn new() -> Self {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = Config {
      upload_dir: dir.path().join("public").join("uploads"),
      public_dir: dir.path().join("public"),
      ..Config::default()
    };

    let videos = VideoStore::new(&config.upload_dir);
    videos.ensure_dir().await.expect("Failed to create upload dir");

    let state = Arc::new(AppState {
      db: setup_test_db().await,
      videos,
    });
    let router = build_router(state.clone(), &config);

    Self { router, state, dir }
  }

  pub fn pool(&self) -> &SqlitePool {
    &self.state.db
  }

  pub fn public_dir(&self) -> PathBuf {
    self.dir.path().join("public")
  }

  pub fn upload_dir(&self) -> &Path {
    self.state.videos.root()
  }

  pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
    let response = self
      .router
      .clone()
      .oneshot(request)
      .await
      .expect("Failed to execute request");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
      .await
      .expect("Failed to read body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
  }

  pub async fn get(&self, uri: &str) -> (StatusCode, String) {
    self.send(empty_request(Method::GET, uri)).await
  }

  pub async fn delete(&self, uri: &str) -> (StatusCode, String) {
    self.send(empty_request(Method::DELETE, uri)).await
  }

  pub async fn post_json<T: Serialize>(&self, uri: &str, body: &T) -> (StatusCode, String) {
    let json = serde_json::to_string(body).expect("Failed to serialize JSON");
    self.post_raw_json(uri, &json).await
  }

  pub async fn post_raw_json(&self, uri: &str, json: &str) -> (StatusCode, String) {
    let request = Request::builder()
      .method(Method::POST)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(json.to_owned()))
      .expect("Failed to build request");
    self.send(request).await
  }

  pub async fn post_form(&self, uri: &str, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
      .method(Method::POST)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body(Body::from(body.to_owned()))
      .expect("Failed to build request");
    self.send(request).await
  }

  pub async fn post_multipart(&self, uri: &str, parts: &[MultipartPart<'_>]) -> (StatusCode, String) {
    let mut body = Vec::new();
    for part in parts {
      body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
      match part.file_name {
        Some(file_name) => body.extend_from_slice(
          format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: video/mp4\r\n\r\n",
            part.name, file_name
          )
          .as_bytes(),
        ),
        None => body.extend_from_slice(
          format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name).as_bytes(),
        ),
      }
      body.extend_from_slice(part.data);
      body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let request = Request::builder()
      .method(Method::POST)
      .uri(uri)
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", BOUNDARY),
      )
      .body(Body::from(body))
      .expect("Failed to build request");
    self.send(request).await
  }

  pub async fn teardown(self) {
    self.state.db.close().await;
  }
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
  Request::builder()
    .method(method)
    .uri(uri)
    .body(Body::empty())
    .expect("Failed to build request")
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    // Verify key tables exist
    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('exercises', 'steps', 'videos')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 3, "Expected 3 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_helpers_return_ids() {
    let pool = setup_test_db().await;

    let ids = seed_exercises(&pool, &["2024-01-01", "2024-01-02", "2024-01-03"]).await;
    assert_eq!(ids.len(), 3);
    assert_eq!(count_rows(&pool, "exercises").await, 3);

    seed_steps(&pool, &["2024-01-01"]).await;
    assert_eq!(count_rows(&pool, "steps").await, 1);

    teardown_test_db(pool).await;
  }
}
