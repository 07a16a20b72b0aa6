//! Document export handlers.
//!
//! Each handler pulls entries from the store, joins the foreign keys to
//! display names, and streams the rendered document back as an attachment
//! with a Russian human-readable filename (RFC 5987 `filename*` form).

use std::{collections::HashMap, sync::Arc};

use axum::{
  extract::{Query, State},
  http::header,
  response::IntoResponse,
};
use chrono::Datelike as _;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use timetable_core::{
  EntityId,
  entity::RefKind,
  entry::ScheduleEntry,
  store::{EntryFilter, ScheduleStore},
};
use timetable_docs::{EntryView, pdf::ScheduleStats};

use crate::{entries::clean, error::ApiError};

const XLSX_MIME: &str =
  "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const DOCX_MIME: &str =
  "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const PDF_MIME: &str = "application/pdf";

/// `Content-Disposition` value for a (possibly non-ASCII) filename.
fn attachment(filename: &str) -> String {
  let encoded = utf8_percent_encode(filename, NON_ALPHANUMERIC);
  format!("attachment; filename*=UTF-8''{encoded}")
}

fn download(
  mime: &'static str,
  filename: String,
  bytes: Vec<u8>,
) -> impl IntoResponse {
  (
    [
      (header::CONTENT_TYPE, mime.to_string()),
      (header::CONTENT_DISPOSITION, attachment(&filename)),
    ],
    bytes,
  )
}

// ─── Display-name join ───────────────────────────────────────────────────────

async fn name_map<S: ScheduleStore>(
  store: &S,
  kind: RefKind,
) -> Result<HashMap<EntityId, String>, ApiError> {
  let entities = store
    .list_refs(kind, None)
    .await
    .map_err(ApiError::from_store)?;
  Ok(entities.into_iter().map(|e| (e.id, e.name)).collect())
}

struct NameMaps {
  groups:   HashMap<EntityId, String>,
  subjects: HashMap<EntityId, String>,
  teachers: HashMap<EntityId, String>,
  rooms:    HashMap<EntityId, String>,
}

impl NameMaps {
  async fn load<S: ScheduleStore>(store: &S) -> Result<Self, ApiError> {
    Ok(Self {
      groups:   name_map(store, RefKind::Group).await?,
      subjects: name_map(store, RefKind::Subject).await?,
      teachers: name_map(store, RefKind::Teacher).await?,
      rooms:    name_map(store, RefKind::Room).await?,
    })
  }

  /// Join one entry to its display names. Dangling keys resolve to
  /// `None`, which the renderers replace with the placeholder text.
  fn view(&self, entry: &ScheduleEntry) -> EntryView {
    let name = |map: &HashMap<EntityId, String>, id: Option<EntityId>| {
      id.and_then(|id| map.get(&id).cloned())
    };
    EntryView {
      date:    entry.date.clone(),
      time:    entry.time.clone(),
      subject: name(&self.subjects, entry.subject_id),
      group:   name(&self.groups, entry.group_id),
      teacher: name(&self.teachers, entry.teacher_id),
      room:    name(&self.rooms, entry.room_id),
      kind:    entry.kind.clone(),
    }
  }
}

// ─── Excel ───────────────────────────────────────────────────────────────────

/// `GET /api/export_excel` — teacher workload workbook over all entries.
pub async fn excel<S: ScheduleStore>(
  State(store): State<Arc<S>>,
) -> Result<impl IntoResponse, ApiError> {
  let entries = store
    .list_entries(&EntryFilter::default())
    .await
    .map_err(ApiError::from_store)?;
  let maps = NameMaps::load(store.as_ref()).await?;
  let views: Vec<EntryView> = entries.iter().map(|e| maps.view(e)).collect();

  let today = chrono::Local::now().date_naive();
  let bytes = timetable_docs::xlsx::workload_workbook(&views, today)?;

  Ok(download(XLSX_MIME, "Нагрузка_преподавателей.xlsx".to_string(), bytes))
}

// ─── Flat dump ───────────────────────────────────────────────────────────────

/// `GET /api/export` — one row per entry, sharing the import column set,
/// so an export can be fed straight back into `/api/import`.
pub async fn table<S: ScheduleStore>(
  State(store): State<Arc<S>>,
) -> Result<impl IntoResponse, ApiError> {
  let entries = store
    .list_entries(&EntryFilter::default())
    .await
    .map_err(ApiError::from_store)?;
  let maps = NameMaps::load(store.as_ref()).await?;
  let views: Vec<EntryView> = entries.iter().map(|e| maps.view(e)).collect();

  let bytes = timetable_docs::xlsx::schedule_workbook(&views)?;

  Ok(download(XLSX_MIME, "itog_export.xlsx".to_string(), bytes))
}

// ─── Word ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct WordParams {
  pub group:      Option<String>,
  pub date_start: Option<String>,
  pub date_end:   Option<String>,
}

/// `GET /api/export_word?group=<name>[&date_start&date_end]` — per-group
/// schedule. The group is addressed by display name, matched
/// case-insensitively.
pub async fn word<S: ScheduleStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<WordParams>,
) -> Result<impl IntoResponse, ApiError> {
  let group_name = params
    .group
    .as_deref()
    .map(str::trim)
    .filter(|g| !g.is_empty())
    .ok_or_else(|| ApiError::BadRequest("group is required".into()))?;

  let group = store
    .list_refs(RefKind::Group, Some(group_name))
    .await
    .map_err(ApiError::from_store)?
    .into_iter()
    .find(|g| g.name.to_lowercase() == group_name.to_lowercase())
    .ok_or_else(|| {
      ApiError::NotFound(format!("group {group_name:?} not found"))
    })?;

  // Empty date params impose no bound, same as everywhere else; an
  // unnormalized `date <= ''` would exclude every row.
  let filter = EntryFilter {
    group_id: Some(group.id),
    date_from: clean(params.date_start.clone()),
    date_to: clean(params.date_end.clone()),
    ..EntryFilter::default()
  };
  let entries = store
    .list_entries(&filter)
    .await
    .map_err(ApiError::from_store)?;
  let maps = NameMaps::load(store.as_ref()).await?;
  let views: Vec<EntryView> = entries.iter().map(|e| maps.view(e)).collect();

  let year = chrono::Local::now().date_naive().year();
  let bytes = timetable_docs::docx::group_schedule_docx(&group.name, &views, year)?;

  Ok(download(
    DOCX_MIME,
    format!("Расписание_{}.docx", group.name),
    bytes,
  ))
}

// ─── PDF ─────────────────────────────────────────────────────────────────────

/// `GET /api/export_pdf` — schedule-approval order with summary
/// statistics over the whole store.
pub async fn pdf<S: ScheduleStore>(
  State(store): State<Arc<S>>,
) -> Result<impl IntoResponse, ApiError> {
  let entries = store
    .list_entries(&EntryFilter::default())
    .await
    .map_err(ApiError::from_store)?;
  let groups = store
    .list_refs(RefKind::Group, None)
    .await
    .map_err(ApiError::from_store)?;
  let teachers = store
    .list_refs(RefKind::Teacher, None)
    .await
    .map_err(ApiError::from_store)?;

  let dates: Vec<&String> = entries.iter().filter_map(|e| e.date.as_ref()).collect();
  let stats = ScheduleStats {
    groups:   groups.len(),
    teachers: teachers.len(),
    lessons:  entries.len(),
    date_min: dates.iter().min().map(|d| (*d).clone()),
    date_max: dates.iter().max().map(|d| (*d).clone()),
  };

  let today = chrono::Local::now().date_naive();
  let bytes = timetable_docs::pdf::approval_order_pdf(&stats, today)?;

  Ok(download(
    PDF_MIME,
    "Приказ_об_утверждении_расписания.pdf".to_string(),
    bytes,
  ))
}
