//! Document formatters for the timetable: the approval-order PDF, the
//! teacher-workload Excel workbook and the per-group Word schedule.
//!
//! Renderers are pure functions from pre-joined display rows to document
//! bytes; no store or HTTP types appear here. Letterhead text is fixed,
//! matching the college's paper forms.

pub mod docx;
pub mod error;
pub mod pdf;
pub mod xlsx;

pub use error::{Error, Result};

/// Substituted wherever a foreign key is null or unresolvable.
pub const PLACEHOLDER: &str = "Не указано";

/// Every lesson counts this many academic hours in the workload report;
/// the store keeps no duration data.
pub const HOURS_PER_LESSON: u32 = 2;

/// Fixed letterhead block shared by all three documents.
pub const LETTERHEAD: [&str; 6] = [
  "МИНИСТЕРСТВО ОБРАЗОВАНИЯ МОСКОВСКОЙ ОБЛАСТИ",
  "ГОСУДАРСТВЕННОЕ ОБРАЗОВАТЕЛЬНОЕ УЧРЕЖДЕНИЕ ВЫСШЕГО",
  "ОБРАЗОВАНИЯ МОСКОВСКОЙ ОБЛАСТИ",
  "«ГОСУДАРСТВЕННЫЙ ГУМАНИТАРНО-ТЕХНОЛОГИЧЕСКИЙ УНИВЕРСИТЕТ»",
  "(ГГТУ)",
  "ЛИКИНО-ДУЛЕВСКИЙ ПОЛИТЕХНИЧЕСКИЙ КОЛЛЕДЖ – ФИЛИАЛ ГГТУ",
];

/// One schedule entry joined against the four reference tables.
///
/// Name fields are `None` when the foreign key was null or dangling; the
/// accessors substitute [`PLACEHOLDER`]. Scalar fields render as empty
/// strings when absent.
#[derive(Debug, Clone, Default)]
pub struct EntryView {
  pub date:    Option<String>,
  pub time:    Option<String>,
  pub subject: Option<String>,
  pub group:   Option<String>,
  pub teacher: Option<String>,
  pub room:    Option<String>,
  pub kind:    Option<String>,
}

impl EntryView {
  pub fn date(&self) -> &str { self.date.as_deref().unwrap_or("") }

  pub fn time(&self) -> &str { self.time.as_deref().unwrap_or("") }

  pub fn kind(&self) -> &str { self.kind.as_deref().unwrap_or("") }

  pub fn subject(&self) -> &str {
    self.subject.as_deref().unwrap_or(PLACEHOLDER)
  }

  pub fn group(&self) -> &str { self.group.as_deref().unwrap_or(PLACEHOLDER) }

  pub fn teacher(&self) -> &str {
    self.teacher.as_deref().unwrap_or(PLACEHOLDER)
  }

  pub fn room(&self) -> &str { self.room.as_deref().unwrap_or(PLACEHOLDER) }
}
