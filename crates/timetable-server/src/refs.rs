//! Handlers for the four reference collections.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/{collection}` | Optional display-name substring query |
//! | `POST`   | `/api/{collection}` | Form body, 400 on a missing/empty value |
//! | `PUT`    | `/api/{collection}/{id}` | Absent value is a no-op |
//! | `DELETE` | `/api/{collection}/{id}` | Orphans referencing entries |
//!
//! `collection` is one of `groups`, `objects`, `preps`, `auditorii`; the
//! form/JSON display field is `name`, `name`, `fio`, `number` respectively.

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
  entity::{RefEntity, RefKind},
  store::ScheduleStore,
};

use crate::error::ApiError;

/// Map a URL collection segment to its reference kind.
fn kind_for(collection: &str) -> Result<RefKind, ApiError> {
  match collection {
    "groups" => Ok(RefKind::Group),
    "objects" => Ok(RefKind::Subject),
    "preps" => Ok(RefKind::Teacher),
    "auditorii" => Ok(RefKind::Room),
    other => Err(ApiError::NotFound(format!("no such collection: {other}"))),
  }
}

/// Serialise a reference entity with the kind's wire field name.
pub(crate) fn ref_json(kind: RefKind, entity: &RefEntity) -> Value {
  let mut obj = serde_json::Map::new();
  obj.insert("id".into(), Value::String(entity.id.to_string()));
  obj.insert(
    kind.display_field().into(),
    Value::String(entity.name.clone()),
  );
  Value::Object(obj)
}

/// Form (and query) body carrying one display value under whichever wire
/// field name the collection uses.
#[derive(Debug, Default, Deserialize)]
pub struct RefForm {
  pub name:   Option<String>,
  pub fio:    Option<String>,
  pub number: Option<String>,
}

impl RefForm {
  /// The supplied value, whichever field carried it, trimmed; empty
  /// strings count as absent.
  fn value(self) -> Option<String> {
    [self.name, self.fio, self.number]
      .into_iter()
      .flatten()
      .map(|v| v.trim().to_string())
      .find(|v| !v.is_empty())
  }
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /api/{collection}[?name=<substring>]`
pub async fn list<S: ScheduleStore>(
  State(store): State<Arc<S>>,
  Path(collection): Path<String>,
  Query(query): Query<RefForm>,
) -> Result<Json<Vec<Value>>, ApiError> {
  let kind = kind_for(&collection)?;
  let filter = query.value();

  let entities = store
    .list_refs(kind, filter.as_deref())
    .await
    .map_err(ApiError::from_store)?;

  Ok(Json(entities.iter().map(|e| ref_json(kind, e)).collect()))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /api/{collection}` — form body with the kind's display field.
pub async fn create<S: ScheduleStore>(
  State(store): State<Arc<S>>,
  Path(collection): Path<String>,
  Form(form): Form<RefForm>,
) -> Result<impl IntoResponse, ApiError> {
  let kind = kind_for(&collection)?;
  let name = form.value().ok_or_else(|| {
    ApiError::BadRequest(format!("{} is required", kind.display_field()))
  })?;

  let entity = store
    .create_ref(kind, &name)
    .await
    .map_err(ApiError::from_store)?;

  Ok((StatusCode::CREATED, Json(ref_json(kind, &entity))))
}

// ─── Rename ──────────────────────────────────────────────────────────────────

/// `PUT /api/{collection}/{id}` — an absent value leaves the row as-is
/// and returns it unchanged.
pub async fn rename<S: ScheduleStore>(
  State(store): State<Arc<S>>,
  Path((collection, id)): Path<(String, i64)>,
  Form(form): Form<RefForm>,
) -> Result<Json<Value>, ApiError> {
  let kind = kind_for(&collection)?;
  let id = EntityId(id);

  let entity = match form.value() {
    Some(name) => store
      .rename_ref(kind, id, &name)
      .await
      .map_err(ApiError::from_store)?,
    None => store
      .get_ref(kind, id)
      .await
      .map_err(ApiError::from_store)?
      .ok_or_else(|| ApiError::NotFound(format!("{kind} {id} not found")))?,
  };

  Ok(Json(ref_json(kind, &entity)))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /api/{collection}/{id}` — nulls the foreign key on referencing
/// schedule entries rather than deleting them.
pub async fn delete_one<S: ScheduleStore>(
  State(store): State<Arc<S>>,
  Path((collection, id)): Path<(String, i64)>,
) -> Result<Json<Value>, ApiError> {
  let kind = kind_for(&collection)?;

  store
    .delete_ref(kind, EntityId(id))
    .await
    .map_err(ApiError::from_store)?;

  Ok(Json(json!({ "ok": true })))
}
