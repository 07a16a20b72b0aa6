//! Parsing an uploaded `.xlsx` workbook into normalised rows.
//!
//! The first worksheet is read; its header row must contain all of the
//! recognised columns (matched case-insensitively, surrounding whitespace
//! ignored) or the whole upload is rejected before any row is processed.
//! Extra columns are ignored.

use std::io::Cursor;

use calamine::{Data, Reader as _, Xlsx};

use crate::{Error, Result};

/// Column headers the worksheet must carry, in wire spelling.
pub const REQUIRED_COLUMNS: [&str; 7] =
  ["date", "time", "subject", "group", "prepod", "auditorium", "type"];

/// One data row of the upload, with every cell reduced to trimmed text.
///
/// `date` is ISO `YYYY-MM-DD` when the cell held a native date; free-text
/// dates pass through as-is with no validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
  /// 1-based spreadsheet row number, for diagnostics.
  pub line:    usize,
  pub date:    Option<String>,
  pub time:    Option<String>,
  pub subject: Option<String>,
  pub group:   Option<String>,
  pub teacher: Option<String>,
  pub room:    Option<String>,
  pub kind:    Option<String>,
}

impl SheetRow {
  /// A row with none of {date, subject, group} carries nothing worth
  /// turning into a schedule entry.
  pub fn is_uninformative(&self) -> bool {
    self.date.is_none() && self.subject.is_none() && self.group.is_none()
  }
}

// ─── Workbook parsing ────────────────────────────────────────────────────────

/// Parse `.xlsx` bytes into rows. Structural problems (no worksheet,
/// missing header columns) reject the whole upload.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<SheetRow>> {
  let mut workbook = Xlsx::new(Cursor::new(bytes))?;
  let range = match workbook.worksheet_range_at(0) {
    Some(range) => range?,
    None => return Err(Error::NoWorksheet),
  };

  let mut rows = range.rows();
  let header = rows.next().ok_or(Error::MissingColumn(REQUIRED_COLUMNS[0]))?;
  let columns = Columns::from_header(header)?;

  Ok(
    rows
      .enumerate()
      .map(|(i, row)| columns.extract(i + 2, row))
      .collect(),
  )
}

/// Indices of the recognised columns within the header row.
struct Columns {
  date:    usize,
  time:    usize,
  subject: usize,
  group:   usize,
  teacher: usize,
  room:    usize,
  kind:    usize,
}

impl Columns {
  fn from_header(header: &[Data]) -> Result<Self> {
    let find = |name: &'static str| -> Result<usize> {
      header
        .iter()
        .position(|cell| match cell {
          Data::String(s) => s.trim().eq_ignore_ascii_case(name),
          _ => false,
        })
        .ok_or(Error::MissingColumn(name))
    };

    Ok(Columns {
      date:    find("date")?,
      time:    find("time")?,
      subject: find("subject")?,
      group:   find("group")?,
      teacher: find("prepod")?,
      room:    find("auditorium")?,
      kind:    find("type")?,
    })
  }

  fn extract(&self, line: usize, row: &[Data]) -> SheetRow {
    let cell = |idx: usize| row.get(idx).unwrap_or(&Data::Empty);

    SheetRow {
      line,
      date:    date_text(cell(self.date)),
      time:    time_text(cell(self.time)),
      subject: plain_text(cell(self.subject)),
      group:   plain_text(cell(self.group)),
      teacher: plain_text(cell(self.teacher)),
      room:    plain_text(cell(self.room)),
      kind:    plain_text(cell(self.kind)),
    }
  }
}

// ─── Cell normalisation ──────────────────────────────────────────────────────

/// Native dates normalise to ISO `YYYY-MM-DD`; anything else passes
/// through as text, unvalidated.
fn date_text(cell: &Data) -> Option<String> {
  match cell {
    Data::DateTime(dt) => dt
      .as_datetime()
      .map(|d| d.date().format("%Y-%m-%d").to_string())
      .or_else(|| plain_text(cell)),
    Data::DateTimeIso(s) => {
      let date = s.split('T').next().unwrap_or(s).trim();
      (!date.is_empty()).then(|| date.to_string())
    }
    other => plain_text(other),
  }
}

/// Native time-of-day cells render as `HH:MM`; anything else passes
/// through as text.
fn time_text(cell: &Data) -> Option<String> {
  match cell {
    Data::DateTime(dt) => dt
      .as_datetime()
      .map(|d| d.format("%H:%M").to_string())
      .or_else(|| plain_text(cell)),
    other => plain_text(other),
  }
}

/// Trimmed textual value of a cell; empty and error cells are absent.
fn plain_text(cell: &Data) -> Option<String> {
  let text = match cell {
    Data::Empty | Data::Error(_) => return None,
    Data::String(s) => s.trim().to_string(),
    // Integral floats print without the trailing ".0" — room numbers and
    // group codes come through Excel as floats.
    Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
    Data::Float(f) => f.to_string(),
    Data::Int(i) => i.to_string(),
    Data::Bool(b) => b.to_string(),
    Data::DateTime(dt) => dt.as_f64().to_string(),
    Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
  };

  (!text.is_empty()).then_some(text)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
