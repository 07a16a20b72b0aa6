//! [`ScheduleEntry`] — one scheduled lesson occurrence ("Itog" row).
//!
//! Every field is optional by design: the model tolerates partially
//! specified lessons, and deleting a referenced entity nulls the foreign
//! key here instead of cascading.

use serde::{Deserialize, Serialize};

use crate::EntityId;

/// A persisted schedule entry.
///
/// Wire field names follow the original API (`object_id`, `prep_id`,
/// `aud_id`, `type`); the Rust names say what the fields actually are.
///
/// `date` is an ISO `YYYY-MM-DD` string when it came from a calendar date,
/// but free-text dates supplied by clients or spreadsheets are stored
/// as-is — ordering and range filters are only meaningful for ISO values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
  pub id:         EntityId,
  pub date:       Option<String>,
  pub time:       Option<String>,
  #[serde(rename = "object_id")]
  pub subject_id: Option<EntityId>,
  #[serde(rename = "group_id")]
  pub group_id:   Option<EntityId>,
  #[serde(rename = "prep_id")]
  pub teacher_id: Option<EntityId>,
  #[serde(rename = "aud_id")]
  pub room_id:    Option<EntityId>,
  #[serde(rename = "type")]
  pub kind:       Option<String>,
}

/// Fields for a new schedule entry; the store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntry {
  pub date:       Option<String>,
  pub time:       Option<String>,
  pub subject_id: Option<EntityId>,
  pub group_id:   Option<EntityId>,
  pub teacher_id: Option<EntityId>,
  pub room_id:    Option<EntityId>,
  pub kind:       Option<String>,
}

/// Partial update of a schedule entry.
///
/// `None` means "leave the stored value unchanged" — there is no way to
/// null a field through an update, matching the source API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
  pub date:       Option<String>,
  pub time:       Option<String>,
  pub subject_id: Option<EntityId>,
  pub group_id:   Option<EntityId>,
  pub teacher_id: Option<EntityId>,
  pub room_id:    Option<EntityId>,
  pub kind:       Option<String>,
}
