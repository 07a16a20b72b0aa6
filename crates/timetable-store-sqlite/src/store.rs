//! [`SqliteStore`] — the SQLite implementation of [`ScheduleStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use timetable_core::{
  EntityId,
  entity::{RefEntity, RefKind},
  entry::{EntryPatch, NewEntry, ScheduleEntry},
  store::{EntryFilter, Resolved, ResolveOutcome, ScheduleStore},
};

use crate::{
  Error, Result,
  schema::SCHEMA,
  sql::{ENTRY_COLUMNS, entry_fk, entry_from_row, ref_from_row, ref_table},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A timetable store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Each
/// method is one logical unit of work on the connection's dedicated
/// thread, so statements from concurrent requests never interleave within
/// a call.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ScheduleStore impl ──────────────────────────────────────────────────────

impl ScheduleStore for SqliteStore {
  type Error = Error;

  // ── Reference entities ────────────────────────────────────────────────────

  async fn list_refs(
    &self,
    kind: RefKind,
    name_filter: Option<&str>,
  ) -> Result<Vec<RefEntity>> {
    let table = ref_table(kind);

    let mut rows: Vec<RefEntity> = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT id, name FROM {table} ORDER BY name"))?;
        let rows = stmt
          .query_map([], |row| ref_from_row(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // Substring filtering happens here rather than in SQL: SQLite's
    // lower() only folds ASCII.
    if let Some(needle) = name_filter {
      let needle = needle.to_lowercase();
      rows.retain(|r| r.name.to_lowercase().contains(&needle));
    }

    Ok(rows)
  }

  async fn create_ref(&self, kind: RefKind, name: &str) -> Result<RefEntity> {
    let table = ref_table(kind);
    let name = name.to_owned();

    let entity = self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("INSERT INTO {table} (name) VALUES (?1)"),
          rusqlite::params![name],
        )?;
        Ok(RefEntity {
          id: EntityId(conn.last_insert_rowid()),
          name,
        })
      })
      .await?;

    Ok(entity)
  }

  async fn rename_ref(
    &self,
    kind: RefKind,
    id: EntityId,
    name: &str,
  ) -> Result<RefEntity> {
    let table = ref_table(kind);
    let name = name.to_owned();
    let name_out = name.clone();

    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          &format!("UPDATE {table} SET name = ?1 WHERE id = ?2"),
          rusqlite::params![name, id.0],
        )?;
        Ok(n)
      })
      .await?;

    if changed == 0 {
      return Err(timetable_core::Error::RefNotFound { kind, id }.into());
    }

    Ok(RefEntity { id, name: name_out })
  }

  async fn get_ref(&self, kind: RefKind, id: EntityId) -> Result<Option<RefEntity>> {
    let table = ref_table(kind);

    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT id, name FROM {table} WHERE id = ?1"),
              rusqlite::params![id.0],
              |row| ref_from_row(row),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(row)
  }

  async fn delete_ref(&self, kind: RefKind, id: EntityId) -> Result<()> {
    let table = ref_table(kind);
    let fk = entry_fk(kind);

    // Null the foreign key on every referencing entry, then remove the
    // row, as one transaction: orphan, don't cascade.
    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          &format!("UPDATE entries SET {fk} = NULL WHERE {fk} = ?1"),
          rusqlite::params![id.0],
        )?;
        let n = tx.execute(
          &format!("DELETE FROM {table} WHERE id = ?1"),
          rusqlite::params![id.0],
        )?;
        tx.commit()?;
        Ok(n)
      })
      .await?;

    if deleted == 0 {
      return Err(timetable_core::Error::RefNotFound { kind, id }.into());
    }

    Ok(())
  }

  async fn resolve_ref(&self, kind: RefKind, raw_name: &str) -> Result<Resolved> {
    let table = ref_table(kind);
    let trimmed = raw_name.trim().to_owned();
    let needle = trimmed.to_lowercase();

    // Lookup and fallback insert run inside one call so another statement
    // on this connection cannot interleave between them. Two separate
    // store instances importing concurrently can still race — a
    // documented risk, not a guarantee.
    let (entity, created) = self
      .conn
      .call(move |conn| {
        let existing = {
          let mut stmt =
            conn.prepare(&format!("SELECT id, name FROM {table}"))?;
          let mut found = None;
          let mut rows = stmt.query([])?;
          while let Some(row) = rows.next()? {
            let candidate = ref_from_row(row)?;
            if candidate.name.to_lowercase() == needle {
              found = Some(candidate);
              break;
            }
          }
          found
        };

        if let Some(entity) = existing {
          return Ok((entity, false));
        }

        conn.execute(
          &format!("INSERT INTO {table} (name) VALUES (?1)"),
          rusqlite::params![trimmed],
        )?;
        let entity = RefEntity {
          id: EntityId(conn.last_insert_rowid()),
          name: trimmed,
        };
        Ok((entity, true))
      })
      .await?;

    Ok(Resolved {
      entity,
      outcome: if created {
        ResolveOutcome::Created
      } else {
        ResolveOutcome::Existing
      },
    })
  }

  // ── Schedule entries ──────────────────────────────────────────────────────

  async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<ScheduleEntry>> {
    let filter = filter.clone();

    let rows = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<&'static str> = vec![];
        let mut params: Vec<rusqlite::types::Value> = vec![];

        if let Some(from) = filter.date_from {
          conds.push("date >= ?");
          params.push(from.into());
        }
        if let Some(to) = filter.date_to {
          conds.push("date <= ?");
          params.push(to.into());
        }
        if let Some(id) = filter.group_id {
          conds.push("group_id = ?");
          params.push(id.0.into());
        }
        if let Some(id) = filter.teacher_id {
          conds.push("teacher_id = ?");
          params.push(id.0.into());
        }
        if let Some(id) = filter.room_id {
          conds.push("room_id = ?");
          params.push(id.0.into());
        }
        if let Some(id) = filter.subject_id {
          conds.push("subject_id = ?");
          params.push(id.0.into());
        }
        if let Some(kind) = filter.kind {
          conds.push("kind = ?");
          params.push(kind.into());
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {ENTRY_COLUMNS} FROM entries {where_clause}
           ORDER BY date IS NULL, date ASC, time IS NULL, time ASC"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| {
            entry_from_row(row)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn get_entry(&self, id: EntityId) -> Result<Option<ScheduleEntry>> {
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1"),
              rusqlite::params![id.0],
              |row| entry_from_row(row),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(row)
  }

  async fn create_entry(&self, new: NewEntry) -> Result<ScheduleEntry> {
    let entry = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO entries (date, time, kind, subject_id, group_id, teacher_id, room_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            new.date,
            new.time,
            new.kind,
            new.subject_id.map(|e| e.0),
            new.group_id.map(|e| e.0),
            new.teacher_id.map(|e| e.0),
            new.room_id.map(|e| e.0),
          ],
        )?;
        Ok(ScheduleEntry {
          id:         EntityId(conn.last_insert_rowid()),
          date:       new.date,
          time:       new.time,
          kind:       new.kind,
          subject_id: new.subject_id,
          group_id:   new.group_id,
          teacher_id: new.teacher_id,
          room_id:    new.room_id,
        })
      })
      .await?;

    Ok(entry)
  }

  async fn update_entry(&self, id: EntityId, patch: EntryPatch) -> Result<ScheduleEntry> {
    let updated = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<&'static str> = vec![];
        let mut params: Vec<rusqlite::types::Value> = vec![];

        if let Some(date) = patch.date {
          sets.push("date = ?");
          params.push(date.into());
        }
        if let Some(time) = patch.time {
          sets.push("time = ?");
          params.push(time.into());
        }
        if let Some(kind) = patch.kind {
          sets.push("kind = ?");
          params.push(kind.into());
        }
        if let Some(sid) = patch.subject_id {
          sets.push("subject_id = ?");
          params.push(sid.0.into());
        }
        if let Some(gid) = patch.group_id {
          sets.push("group_id = ?");
          params.push(gid.0.into());
        }
        if let Some(tid) = patch.teacher_id {
          sets.push("teacher_id = ?");
          params.push(tid.0.into());
        }
        if let Some(rid) = patch.room_id {
          sets.push("room_id = ?");
          params.push(rid.0.into());
        }

        // An empty patch is a no-op: the current row is returned
        // unchanged.
        if !sets.is_empty() {
          params.push(id.0.into());
          conn.execute(
            &format!("UPDATE entries SET {} WHERE id = ?", sets.join(", ")),
            rusqlite::params_from_iter(params),
          )?;
        }

        Ok(
          conn
            .query_row(
              &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1"),
              rusqlite::params![id.0],
              |row| entry_from_row(row),
            )
            .optional()?,
        )
      })
      .await?;

    updated.ok_or_else(|| timetable_core::Error::EntryNotFound(id).into())
  }

  async fn delete_entry(&self, id: EntityId) -> Result<()> {
    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM entries WHERE id = ?1",
          rusqlite::params![id.0],
        )?;
        Ok(n)
      })
      .await?;

    if deleted == 0 {
      return Err(timetable_core::Error::EntryNotFound(id).into());
    }

    Ok(())
  }
}
