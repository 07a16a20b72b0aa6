//! Error type for `timetable-import`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The upload did not declare a recognised spreadsheet content type.
  #[error("unsupported content type: {0}")]
  UnsupportedContentType(String),

  /// The workbook contains no worksheet at all.
  #[error("workbook has no worksheet")]
  NoWorksheet,

  /// The header row lacks one of the required columns. Rejects the whole
  /// batch before any row is processed.
  #[error("missing required column: {0}")]
  MissingColumn(&'static str),

  #[error("spreadsheet error: {0}")]
  Sheet(#[from] calamine::XlsxError),
}

impl Error {
  /// True for structural problems the client caused (wrong upload type,
  /// missing columns) as opposed to unexpected processing failures.
  pub fn is_structural(&self) -> bool {
    matches!(
      self,
      Error::UnsupportedContentType(_) | Error::NoWorksheet | Error::MissingColumn(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
