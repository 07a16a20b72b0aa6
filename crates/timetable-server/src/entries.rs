//! Handlers for `/api/itog` — the schedule entries.
//!
//! All bodies are form-encoded and every field is optional. Wire field
//! names follow the original API: `object_id`, `prep_id`, `aud_id`,
//! `type`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Form, Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use timetable_core::{
  EntityId,
  entry::{EntryPatch, NewEntry, ScheduleEntry},
  store::{EntryFilter, ScheduleStore},
};

use crate::error::ApiError;

/// Parse an optional form/query id field. Empty strings count as absent;
/// non-integer values are a client error.
fn parse_id(field: &str, value: Option<String>) -> Result<Option<EntityId>, ApiError> {
  let Some(value) = value else { return Ok(None) };
  let value = value.trim();
  if value.is_empty() {
    return Ok(None);
  }
  value
    .parse()
    .map(Some)
    .map_err(|_| ApiError::BadRequest(format!("{field} must be an integer id")))
}

/// Trim an optional text field, treating the empty string as absent.
pub(crate) fn clean(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub date_from: Option<String>,
  pub date_to:   Option<String>,
  pub group_id:  Option<String>,
  pub prep_id:   Option<String>,
  pub aud_id:    Option<String>,
  pub object_id: Option<String>,
  #[serde(rename = "type")]
  pub kind:      Option<String>,
}

impl ListParams {
  fn into_filter(self) -> Result<EntryFilter, ApiError> {
    Ok(EntryFilter {
      date_from:  clean(self.date_from),
      date_to:    clean(self.date_to),
      group_id:   parse_id("group_id", self.group_id)?,
      teacher_id: parse_id("prep_id", self.prep_id)?,
      room_id:    parse_id("aud_id", self.aud_id)?,
      subject_id: parse_id("object_id", self.object_id)?,
      kind:       clean(self.kind),
    })
  }
}

/// `GET /api/itog` with optional conjunctive filters.
pub async fn list<S: ScheduleStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ScheduleEntry>>, ApiError> {
  let filter = params.into_filter()?;
  let entries = store
    .list_entries(&filter)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(entries))
}

// ─── Create / update form ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct EntryForm {
  pub date:      Option<String>,
  pub time:      Option<String>,
  pub object_id: Option<String>,
  pub group_id:  Option<String>,
  pub prep_id:   Option<String>,
  pub aud_id:    Option<String>,
  #[serde(rename = "type")]
  pub kind:      Option<String>,
}

/// `POST /api/itog` — every field optional.
pub async fn create<S: ScheduleStore>(
  State(store): State<Arc<S>>,
  Form(form): Form<EntryForm>,
) -> Result<impl IntoResponse, ApiError> {
  let new = NewEntry {
    date:       clean(form.date),
    time:       clean(form.time),
    subject_id: parse_id("object_id", form.object_id)?,
    group_id:   parse_id("group_id", form.group_id)?,
    teacher_id: parse_id("prep_id", form.prep_id)?,
    room_id:    parse_id("aud_id", form.aud_id)?,
    kind:       clean(form.kind),
  };

  let entry = store
    .create_entry(new)
    .await
    .map_err(ApiError::from_store)?;

  Ok((StatusCode::CREATED, Json(entry)))
}

/// `PUT /api/itog/{id}` — absent fields leave the stored values alone.
pub async fn update<S: ScheduleStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Form(form): Form<EntryForm>,
) -> Result<Json<ScheduleEntry>, ApiError> {
  let patch = EntryPatch {
    date:       clean(form.date),
    time:       clean(form.time),
    subject_id: parse_id("object_id", form.object_id)?,
    group_id:   parse_id("group_id", form.group_id)?,
    teacher_id: parse_id("prep_id", form.prep_id)?,
    room_id:    parse_id("aud_id", form.aud_id)?,
    kind:       clean(form.kind),
  };

  let entry = store
    .update_entry(EntityId(id), patch)
    .await
    .map_err(ApiError::from_store)?;

  Ok(Json(entry))
}

/// `DELETE /api/itog/{id}`
pub async fn delete_one<S: ScheduleStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
  store
    .delete_entry(EntityId(id))
    .await
    .map_err(ApiError::from_store)?;

  Ok(Json(json!({ "ok": true })))
}
