//! `POST /api/import` — spreadsheet upload.
//!
//! Accepts a multipart form with one `.xlsx` file field. Structural
//! problems (wrong content type, missing columns) reject the whole batch
//! with a 400 before any row is committed; a failure on an individual row
//! only skips that row.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Multipart, State},
};
use serde_json::{Value, json};
use timetable_core::store::ScheduleStore;
use timetable_import::{import_rows, is_spreadsheet_content_type, parse_workbook};
use tracing::info;

use crate::error::ApiError;

/// `POST /api/import` — multipart body with a `file` field.
pub async fn handler<S: ScheduleStore>(
  State(store): State<Arc<S>>,
  mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
  let field = loop {
    let field = multipart
      .next_field()
      .await
      .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?;
    match field {
      None => return Err(ApiError::BadRequest("no file field in upload".into())),
      Some(f) if f.name() == Some("file") || f.file_name().is_some() => break f,
      Some(_) => continue,
    }
  };

  let content_type = field.content_type().unwrap_or_default().to_string();
  if !is_spreadsheet_content_type(&content_type) {
    return Err(
      timetable_import::Error::UnsupportedContentType(content_type).into(),
    );
  }

  let bytes = field
    .bytes()
    .await
    .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;

  let rows = parse_workbook(&bytes)?;
  let outcome = import_rows(store.as_ref(), rows).await;
  info!(
    created = outcome.count(),
    skipped = outcome.skipped.len(),
    "import finished"
  );

  Ok(Json(json!({
    "created": outcome.created,
    "count":   outcome.count(),
  })))
}
