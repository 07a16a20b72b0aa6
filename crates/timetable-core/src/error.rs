//! Error types for `timetable-core`.

use thiserror::Error;

use crate::{EntityId, entity::RefKind};

#[derive(Debug, Error)]
pub enum Error {
  #[error("{kind} {id} not found")]
  RefNotFound { kind: RefKind, id: EntityId },

  #[error("schedule entry {0} not found")]
  EntryNotFound(EntityId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
