//! The `ScheduleStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `timetable-store-sqlite`). Higher layers (`timetable-server`,
//! `timetable-import`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use crate::{
  EntityId,
  entity::{RefEntity, RefKind},
  entry::{EntryPatch, NewEntry, ScheduleEntry},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Conjunctive filter for [`ScheduleStore::list_entries`].
///
/// Every field is optional; an absent field imposes no constraint. Date
/// bounds are inclusive and compare lexicographically (meaningful for ISO
/// dates).
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
  pub date_from:  Option<String>,
  pub date_to:    Option<String>,
  pub group_id:   Option<EntityId>,
  pub teacher_id: Option<EntityId>,
  pub room_id:    Option<EntityId>,
  pub subject_id: Option<EntityId>,
  /// Exact match on the lesson type.
  pub kind:       Option<String>,
}

// ─── Resolve-or-create ───────────────────────────────────────────────────────

/// Whether [`ScheduleStore::resolve_ref`] found an existing row or had to
/// create one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
  Existing,
  Created,
}

/// Result of a resolve-or-create lookup, tagged so callers can tell the
/// two paths apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
  pub entity:  RefEntity,
  pub outcome: ResolveOutcome,
}

impl Resolved {
  pub fn id(&self) -> EntityId { self.entity.id }

  pub fn was_created(&self) -> bool {
    self.outcome == ResolveOutcome::Created
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a timetable store backend.
///
/// Each method is one logical unit of work; backends acquire and release
/// whatever connection they need inside the call. All methods return `Send`
/// futures so the trait can be used from multi-threaded async runtimes
/// (tokio with `axum`).
pub trait ScheduleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reference entities ────────────────────────────────────────────────

  /// List all rows of `kind`, sorted ascending by display name.
  /// `name_filter` restricts to names containing the given substring,
  /// case-insensitively.
  fn list_refs<'a>(
    &'a self,
    kind: RefKind,
    name_filter: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<RefEntity>, Self::Error>> + Send + 'a;

  /// Create a row of `kind` with the given display name and return it.
  fn create_ref<'a>(
    &'a self,
    kind: RefKind,
    name: &'a str,
  ) -> impl Future<Output = Result<RefEntity, Self::Error>> + Send + 'a;

  /// Replace the display name of an existing row. Fails with a not-found
  /// error if `id` does not exist.
  fn rename_ref<'a>(
    &'a self,
    kind: RefKind,
    id: EntityId,
    name: &'a str,
  ) -> impl Future<Output = Result<RefEntity, Self::Error>> + Send + 'a;

  /// Fetch one row of `kind` by id. Returns `None` if not found.
  fn get_ref(
    &self,
    kind: RefKind,
    id: EntityId,
  ) -> impl Future<Output = Result<Option<RefEntity>, Self::Error>> + Send + '_;

  /// Delete a row of `kind`.
  ///
  /// Nulls the corresponding foreign key on every referencing schedule
  /// entry, then removes the row, as one atomic unit of work. Fails with a
  /// not-found error if `id` does not exist; referencing entries are
  /// orphaned, never deleted.
  fn delete_ref(
    &self,
    kind: RefKind,
    id: EntityId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Resolve a free-text name to a row of `kind`, creating one if absent.
  ///
  /// The name is trimmed and matched case-insensitively against existing
  /// display names; on a miss a new row is created with the trimmed,
  /// original-case name. The returned [`Resolved`] says which path was
  /// taken.
  fn resolve_ref<'a>(
    &'a self,
    kind: RefKind,
    raw_name: &'a str,
  ) -> impl Future<Output = Result<Resolved, Self::Error>> + Send + 'a;

  // ── Schedule entries ──────────────────────────────────────────────────

  /// Return entries matching `filter`, ordered ascending by date then
  /// time, nulls last in both keys. No pagination.
  fn list_entries<'a>(
    &'a self,
    filter: &'a EntryFilter,
  ) -> impl Future<Output = Result<Vec<ScheduleEntry>, Self::Error>> + Send + 'a;

  /// Fetch one entry by id. Returns `None` if not found.
  fn get_entry(
    &self,
    id: EntityId,
  ) -> impl Future<Output = Result<Option<ScheduleEntry>, Self::Error>> + Send + '_;

  /// Insert a new entry and return it with its assigned id.
  fn create_entry(
    &self,
    new: NewEntry,
  ) -> impl Future<Output = Result<ScheduleEntry, Self::Error>> + Send + '_;

  /// Apply `patch` to an existing entry; absent patch fields leave the
  /// stored values unchanged. Fails with a not-found error if `id` does
  /// not exist.
  fn update_entry(
    &self,
    id: EntityId,
    patch: EntryPatch,
  ) -> impl Future<Output = Result<ScheduleEntry, Self::Error>> + Send + '_;

  /// Delete one entry. Fails with a not-found error if `id` does not
  /// exist.
  fn delete_entry(
    &self,
    id: EntityId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
