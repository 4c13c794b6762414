//! HTTP surface: JSON API routes plus static files for the front end

pub mod exercises;
pub mod history;
pub mod steps;
pub mod videos;

use std::sync::Arc;

use axum::{
  async_trait,
  extract::{DefaultBodyLimit, FromRequest, Request},
  http::header,
  routing::{delete, get, post},
  Form, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::db::AppState;
use crate::error::AppError;
use crate::media::PUBLIC_PREFIX;

/// `axum::Json` with rejections reported as plain-text 400s
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Body accepted either as JSON or as an urlencoded form (what plain HTML
/// forms post). Chosen by `Content-Type`; anything else is treated as JSON.
#[derive(Debug)]
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
  S: Send + Sync,
  T: DeserializeOwned + Send + 'static,
{
  type Rejection = AppError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let is_form = req
      .headers()
      .get(header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
      let Form(value) = Form::<T>::from_request(req, state).await?;
      Ok(Self(value))
    } else {
      let ApiJson(value) = ApiJson::<T>::from_request(req, state).await?;
      Ok(Self(value))
    }
  }
}

/// Body returned after creating a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct Created {
  pub id: i64,
}

fn api_routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/exercises", get(exercises::list_exercises).post(exercises::save_exercise))
    .route("/steps", get(steps::list_steps).post(steps::save_steps))
    .route("/upload-video", post(videos::upload_video))
    .route("/videos", get(videos::list_videos))
    .route("/videos/:id", delete(videos::delete_video))
    .route("/history", delete(history::clear_history))
    .route("/batch-save-data", post(history::batch_save_data))
}

/// Build the full application router (used by `run` and tests).
/// API routes answer both under `/api` and at the bare path.
pub fn build_router(state: Arc<AppState>, config: &Config) -> Router {
  let uploads = ServeDir::new(state.videos.root());

  Router::new()
    .nest("/api", api_routes())
    .merge(api_routes())
    .nest_service(PUBLIC_PREFIX, uploads)
    .fallback_service(ServeDir::new(&config.public_dir))
    .layer(DefaultBodyLimit::max(config.max_upload_bytes))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
