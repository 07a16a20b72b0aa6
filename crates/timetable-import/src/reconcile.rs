//! The import reconciler: rows in, committed schedule entries out.
//!
//! Each present name field resolves to a reference entity via the store's
//! resolve-or-create primitive, so an administrator never has to
//! pre-register groups, teachers or rooms before importing a schedule.
//! The price is that near-duplicate names differing by more than
//! case/whitespace accumulate — a deliberate usability trade.

use timetable_core::{entity::RefKind, entry::NewEntry, store::ScheduleStore};
use tracing::{debug, warn};

use crate::sheet::SheetRow;

/// What an import batch produced.
///
/// Per-row failures never abort the batch; they are collected here for
/// diagnostics and logged, but only `created` is reported to the caller's
/// success channel.
#[derive(Debug)]
pub struct ImportOutcome<E> {
  pub created: Vec<timetable_core::entry::ScheduleEntry>,
  pub skipped: Vec<SkippedRow<E>>,
}

/// A row that failed mid-processing and was passed over.
#[derive(Debug)]
pub struct SkippedRow<E> {
  pub line:  usize,
  pub error: E,
}

impl<E> ImportOutcome<E> {
  pub fn count(&self) -> usize { self.created.len() }
}

/// Run the reconciler over `rows`.
///
/// Uninformative rows (none of date/subject/group present) are dropped
/// without counting. The batch is not atomic: rows committed before a
/// failure stay committed.
pub async fn import_rows<S: ScheduleStore>(
  store: &S,
  rows: Vec<SheetRow>,
) -> ImportOutcome<S::Error> {
  let mut outcome = ImportOutcome { created: vec![], skipped: vec![] };

  for row in rows {
    if row.is_uninformative() {
      debug!(line = row.line, "skipping row without date, subject or group");
      continue;
    }

    let line = row.line;
    match import_row(store, row).await {
      Ok(entry) => outcome.created.push(entry),
      Err(error) => {
        warn!(line, %error, "import row failed, continuing batch");
        outcome.skipped.push(SkippedRow { line, error });
      }
    }
  }

  outcome
}

async fn import_row<S: ScheduleStore>(
  store: &S,
  row: SheetRow,
) -> Result<timetable_core::entry::ScheduleEntry, S::Error> {
  let subject_id = resolve(store, RefKind::Subject, row.subject.as_deref()).await?;
  let group_id = resolve(store, RefKind::Group, row.group.as_deref()).await?;
  let teacher_id = resolve(store, RefKind::Teacher, row.teacher.as_deref()).await?;
  let room_id = resolve(store, RefKind::Room, row.room.as_deref()).await?;

  store
    .create_entry(NewEntry {
      date: row.date,
      time: row.time,
      kind: row.kind,
      subject_id,
      group_id,
      teacher_id,
      room_id,
    })
    .await
}

async fn resolve<S: ScheduleStore>(
  store: &S,
  kind: RefKind,
  name: Option<&str>,
) -> Result<Option<timetable_core::EntityId>, S::Error> {
  match name {
    Some(name) => {
      let resolved = store.resolve_ref(kind, name).await?;
      if resolved.was_created() {
        debug!(%kind, name = %resolved.entity.name, "created reference entity during import");
      }
      Ok(Some(resolved.id()))
    }
    None => Ok(None),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use timetable_core::store::EntryFilter;
  use timetable_store_sqlite::SqliteStore;

  use super::*;

  async fn store() -> SqliteStore {
    SqliteStore::open_in_memory().await.unwrap()
  }

  fn row(date: &str, subject: &str, group: &str) -> SheetRow {
    SheetRow {
      line: 2,
      date: (!date.is_empty()).then(|| date.to_string()),
      subject: (!subject.is_empty()).then(|| subject.to_string()),
      group: (!group.is_empty()).then(|| group.to_string()),
      ..SheetRow::default()
    }
  }

  #[tokio::test]
  async fn uninformative_row_creates_nothing_and_is_not_counted() {
    let s = store().await;
    let rows = vec![SheetRow { line: 2, time: Some("08:30".into()), ..SheetRow::default() }];

    let outcome = import_rows(&s, rows).await;
    assert_eq!(outcome.count(), 0);
    assert!(outcome.skipped.is_empty());
    assert!(s.list_entries(&EntryFilter::default()).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn matching_subject_is_reused_case_insensitively() {
    let s = store().await;
    let math = s.create_ref(RefKind::Subject, "Math").await.unwrap();

    let outcome = import_rows(&s, vec![row("2025-09-01", "math", "G-1")]).await;
    assert_eq!(outcome.count(), 1);
    assert_eq!(outcome.created[0].subject_id, Some(math.id));

    let subjects = s.list_refs(RefKind::Subject, None).await.unwrap();
    assert_eq!(subjects.len(), 1, "no duplicate subject");
  }

  #[tokio::test]
  async fn unmatched_subject_is_created_with_trimmed_name() {
    let s = store().await;

    let outcome = import_rows(&s, vec![row("2025-09-01", "Philosophy", "G-1")]).await;
    assert_eq!(outcome.count(), 1);

    let subjects = s.list_refs(RefKind::Subject, None).await.unwrap();
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0].name, "Philosophy");
    assert_eq!(outcome.created[0].subject_id, Some(subjects[0].id));
  }

  #[tokio::test]
  async fn import_resolves_all_four_reference_kinds() {
    let s = store().await;
    let rows = vec![SheetRow {
      line: 2,
      date: Some("2025-09-01".into()),
      time: Some("08:30".into()),
      subject: Some("Math".into()),
      group: Some("G-1".into()),
      teacher: Some("Ivanov I.I.".into()),
      room: Some("101".into()),
      kind: Some("лекция".into()),
    }];

    let outcome = import_rows(&s, rows).await;
    assert_eq!(outcome.count(), 1);
    let entry = &outcome.created[0];
    assert!(entry.subject_id.is_some());
    assert!(entry.group_id.is_some());
    assert!(entry.teacher_id.is_some());
    assert!(entry.room_id.is_some());
    assert_eq!(entry.kind.as_deref(), Some("лекция"));
  }

  #[tokio::test]
  async fn same_name_across_rows_resolves_to_one_entity() {
    let s = store().await;
    let rows = vec![
      row("2025-09-01", "Math", "G-1"),
      row("2025-09-02", " MATH ", "g-1"),
    ];

    let outcome = import_rows(&s, rows).await;
    assert_eq!(outcome.count(), 2);
    assert_eq!(s.list_refs(RefKind::Subject, None).await.unwrap().len(), 1);
    assert_eq!(s.list_refs(RefKind::Group, None).await.unwrap().len(), 1);
    assert_eq!(outcome.created[0].subject_id, outcome.created[1].subject_id);
  }

  #[tokio::test]
  async fn partial_rows_still_import() {
    let s = store().await;
    // Only a date: informative enough to commit an entry with all
    // foreign keys null.
    let outcome = import_rows(&s, vec![row("2025-09-01", "", "")]).await;
    assert_eq!(outcome.count(), 1);
    assert!(outcome.created[0].subject_id.is_none());
    assert!(outcome.created[0].group_id.is_none());
  }
}
