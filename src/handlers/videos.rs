use std::sync::Arc;

use axum::{
  body::Bytes,
  extract::{Multipart, Path, State},
  http::StatusCode,
  Json,
};
use tracing::info;

use crate::db::AppState;
use crate::error::AppError;
use crate::media::{self, FileRemoval};
use crate::models::VideoRecord;

struct UploadedFile {
  name: String,
  data: Bytes,
}

/// `POST /upload-video`: multipart form with a `video` file and a `title`
pub async fn upload_video(
  State(state): State<Arc<AppState>>,
  mut multipart: Multipart,
) -> Result<(StatusCode, &'static str), AppError> {
  let mut title = None;
  let mut file = None;

  while let Some(field) = multipart.next_field().await? {
    let name = field.name().map(str::to_string);
    match name.as_deref() {
      Some("title") => title = Some(field.text().await?),
      Some("video") => {
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        // Browsers send an empty part when no file was picked
        if !file_name.is_empty() || !data.is_empty() {
          file = Some(UploadedFile { name: file_name, data });
        }
      }
      _ => {}
    }
  }

  let file = file.ok_or_else(|| AppError::BadRequest("No file uploaded.".to_string()))?;
  let title = title.ok_or_else(|| AppError::BadRequest("Missing required field: title".to_string()))?;

  media::save_upload(&state.db, &state.videos, &title, &file.name, &file.data).await?;

  Ok((StatusCode::CREATED, "Video uploaded and saved."))
}

pub async fn list_videos(
  State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VideoRecord>>, AppError> {
  Ok(Json(media::list_videos(&state.db).await?))
}

/// `DELETE /videos/:id`: the row goes even if the file could not be removed
pub async fn delete_video(
  State(state): State<Arc<AppState>>,
  Path(id): Path<i64>,
) -> Result<&'static str, AppError> {
  match media::delete_video(&state.db, &state.videos, id).await? {
    None => Err(AppError::NotFound("Video not found.".to_string())),
    Some(removal) => {
      if removal == FileRemoval::AlreadyGone {
        info!("Video {} had no file on disk", id);
      }
      Ok("Video deleted.")
    }
  }
}
