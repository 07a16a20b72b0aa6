//! Error type for `timetable-docs`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("xlsx error: {0}")]
  Xlsx(#[from] rust_xlsxwriter::XlsxError),

  #[error("docx error: {0}")]
  Docx(String),

  #[error("pdf error: {0}")]
  Pdf(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
