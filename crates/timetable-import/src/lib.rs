//! Spreadsheet import for the timetable store.
//!
//! Two halves: [`sheet`] turns uploaded `.xlsx` bytes into normalised
//! [`SheetRow`]s (fail-fast on structural problems), and [`reconcile`]
//! turns rows into committed schedule entries, resolving free-text names
//! to reference entities and creating missing ones on the fly.

pub mod error;
pub mod reconcile;
pub mod sheet;

pub use error::{Error, Result};
pub use reconcile::{ImportOutcome, SkippedRow, import_rows};
pub use sheet::{SheetRow, parse_workbook};

/// Content types accepted for an uploaded spreadsheet.
pub const SPREADSHEET_CONTENT_TYPES: [&str; 2] = [
  "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
  "application/vnd.ms-excel",
];

/// True when `content_type` names a recognised spreadsheet format.
pub fn is_spreadsheet_content_type(content_type: &str) -> bool {
  SPREADSHEET_CONTENT_TYPES.contains(&content_type)
}
