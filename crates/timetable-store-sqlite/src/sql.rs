//! Mapping between [`RefKind`]/domain types and the SQLite tables.
//!
//! The four reference tables share one column shape, so every statement is
//! written once and parameterised over the table and foreign-key column
//! names. Case-insensitive name comparison happens in Rust
//! (`str::to_lowercase`), not in SQL — SQLite's `lower()` only folds
//! ASCII, which would break Cyrillic names.

use rusqlite::Row;
use timetable_core::{EntityId, entity::RefEntity, entry::ScheduleEntry};

/// Table holding rows of this reference kind.
pub(crate) fn ref_table(kind: timetable_core::entity::RefKind) -> &'static str {
  use timetable_core::entity::RefKind::*;
  match kind {
    Group => "groups",
    Subject => "subjects",
    Teacher => "teachers",
    Room => "rooms",
  }
}

/// Foreign-key column in `entries` pointing at this reference kind.
pub(crate) fn entry_fk(kind: timetable_core::entity::RefKind) -> &'static str {
  use timetable_core::entity::RefKind::*;
  match kind {
    Group => "group_id",
    Subject => "subject_id",
    Teacher => "teacher_id",
    Room => "room_id",
  }
}

/// Map a `SELECT id, name` row.
pub(crate) fn ref_from_row(row: &Row<'_>) -> rusqlite::Result<RefEntity> {
  Ok(RefEntity {
    id:   EntityId(row.get(0)?),
    name: row.get(1)?,
  })
}

/// Column list matching [`entry_from_row`].
pub(crate) const ENTRY_COLUMNS: &str =
  "id, date, time, kind, subject_id, group_id, teacher_id, room_id";

/// Map a row selected with [`ENTRY_COLUMNS`].
pub(crate) fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<ScheduleEntry> {
  Ok(ScheduleEntry {
    id:         EntityId(row.get(0)?),
    date:       row.get(1)?,
    time:       row.get(2)?,
    kind:       row.get(3)?,
    subject_id: row.get::<_, Option<i64>>(4)?.map(EntityId),
    group_id:   row.get::<_, Option<i64>>(5)?.map(EntityId),
    teacher_id: row.get::<_, Option<i64>>(6)?.map(EntityId),
    room_id:    row.get::<_, Option<i64>>(7)?.map(EntityId),
  })
}
