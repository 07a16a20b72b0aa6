//! Error type for `timetable-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] timetable_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

impl Error {
  /// True when the underlying cause is a not-found condition, regardless
  /// of which entity kind it concerns.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Error::Core(
        timetable_core::Error::RefNotFound { .. }
          | timetable_core::Error::EntryNotFound(_)
      )
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
