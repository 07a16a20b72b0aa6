//! Teacher-workload workbook ("Распределение учебной нагрузки
//! преподавателей").
//!
//! One row per lesson, ordered by teacher name, with a fixed
//! hours-per-lesson figure and a grand-total row — the store keeps no
//! duration data, so the tally is count-based.

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};

use crate::{EntryView, HOURS_PER_LESSON, LETTERHEAD, Result};

const COLUMNS: [(&str, f64); 8] = [
  ("№", 8.0),
  ("ФИО преподавателя", 25.0),
  ("Должность", 15.0),
  ("Дисциплина", 25.0),
  ("Кол-во часов", 12.0),
  ("Группа", 15.0),
  ("Аудитория", 12.0),
  ("Всего часов", 12.0),
];

const TITLE: &str = "РАСПРЕДЕЛЕНИЕ УЧЕБНОЙ НАГРУЗКИ ПРЕПОДАВАТЕЛЕЙ";
const EMPTY_ROW_TEXT: &str = "Нет данных";

/// Render the workload workbook for `entries`.
///
/// An empty entry set still produces a workbook, with a single
/// placeholder row.
pub fn workload_workbook(
  entries: &[EntryView],
  generated_on: NaiveDate,
) -> Result<Vec<u8>> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  sheet.set_name("Нагрузка преподавателей")?;

  let letterhead_fmt = Format::new().set_bold().set_align(FormatAlign::Center);
  let title_fmt = Format::new()
    .set_bold()
    .set_font_size(14)
    .set_align(FormatAlign::Center);
  let header_fmt = Format::new()
    .set_bold()
    .set_align(FormatAlign::Center)
    .set_align(FormatAlign::VerticalCenter)
    .set_border(FormatBorder::Thin);
  let cell_fmt = Format::new()
    .set_align(FormatAlign::Center)
    .set_align(FormatAlign::VerticalCenter)
    .set_text_wrap()
    .set_border(FormatBorder::Thin);
  let total_label_fmt = Format::new()
    .set_bold()
    .set_align(FormatAlign::Right)
    .set_border(FormatBorder::Thin);
  let total_value_fmt = Format::new()
    .set_bold()
    .set_align(FormatAlign::Center)
    .set_border(FormatBorder::Thin);

  for (col, (_, width)) in COLUMNS.iter().enumerate() {
    sheet.set_column_width(col as u16, *width)?;
  }

  // Letterhead + report title block.
  let mut row: u32 = 0;
  for line in LETTERHEAD {
    sheet.merge_range(row, 0, row, 7, line, &letterhead_fmt)?;
    row += 1;
  }
  sheet.merge_range(row, 0, row, 7, TITLE, &title_fmt)?;
  row += 1;
  sheet.merge_range(
    row,
    0,
    row,
    7,
    &format!("Дата формирования: {}", generated_on.format("%d.%m.%Y")),
    &letterhead_fmt,
  )?;
  row += 1;

  for (col, (header, _)) in COLUMNS.iter().enumerate() {
    sheet.write_string_with_format(row, col as u16, *header, &header_fmt)?;
  }
  row += 1;

  // Table body, ordered by teacher name.
  let mut ordered: Vec<&EntryView> = entries.iter().collect();
  ordered.sort_by(|a, b| a.teacher().cmp(b.teacher()));

  let mut total_hours: u32 = 0;
  if ordered.is_empty() {
    sheet.write_string_with_format(row, 0, "1", &cell_fmt)?;
    sheet.write_string_with_format(row, 1, EMPTY_ROW_TEXT, &cell_fmt)?;
    for col in 2..8u16 {
      if col == 4 || col == 7 {
        sheet.write_number_with_format(row, col, 0.0, &cell_fmt)?;
      } else {
        sheet.write_string_with_format(row, col, "", &cell_fmt)?;
      }
    }
    row += 1;
  } else {
    for (i, entry) in ordered.iter().enumerate() {
      let hours = HOURS_PER_LESSON;
      total_hours += hours;
      sheet.write_number_with_format(row, 0, (i + 1) as f64, &cell_fmt)?;
      sheet.write_string_with_format(row, 1, entry.teacher(), &cell_fmt)?;
      sheet.write_string_with_format(row, 2, "Преподаватель", &cell_fmt)?;
      sheet.write_string_with_format(row, 3, entry.subject(), &cell_fmt)?;
      sheet.write_number_with_format(row, 4, hours as f64, &cell_fmt)?;
      sheet.write_string_with_format(row, 5, entry.group(), &cell_fmt)?;
      sheet.write_string_with_format(row, 6, entry.room(), &cell_fmt)?;
      sheet.write_number_with_format(row, 7, hours as f64, &cell_fmt)?;
      row += 1;
    }
  }

  sheet.merge_range(row, 0, row, 3, "ВСЕГО часов:", &total_label_fmt)?;
  sheet.write_number_with_format(row, 4, total_hours as f64, &total_value_fmt)?;
  for col in 5..8u16 {
    sheet.write_string_with_format(row, col, "", &total_value_fmt)?;
  }

  Ok(workbook.save_to_buffer()?)
}

// ─── Flat dump ───────────────────────────────────────────────────────────────

/// Column headers of the flat dump, matching the import format.
pub const FLAT_COLUMNS: [&str; 7] =
  ["date", "time", "subject", "group", "prepod", "auditorium", "type"];

/// Render the flat one-row-per-entry dump.
///
/// No letterhead, no placeholder substitution: absent values come out as
/// empty cells, and the column set matches the spreadsheet import, so an
/// export can be fed straight back in.
pub fn schedule_workbook(entries: &[EntryView]) -> Result<Vec<u8>> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  sheet.set_name("Itog")?;

  let header_fmt = Format::new().set_bold();
  for (col, header) in FLAT_COLUMNS.iter().enumerate() {
    sheet.write_string_with_format(0, col as u16, *header, &header_fmt)?;
  }

  for (i, entry) in entries.iter().enumerate() {
    let row = i as u32 + 1;
    let cells = [
      entry.date.as_deref().unwrap_or(""),
      entry.time.as_deref().unwrap_or(""),
      entry.subject.as_deref().unwrap_or(""),
      entry.group.as_deref().unwrap_or(""),
      entry.teacher.as_deref().unwrap_or(""),
      entry.room.as_deref().unwrap_or(""),
      entry.kind.as_deref().unwrap_or(""),
    ];
    for (col, value) in cells.iter().enumerate() {
      sheet.write_string(row, col as u16, *value)?;
    }
  }

  Ok(workbook.save_to_buffer()?)
}
