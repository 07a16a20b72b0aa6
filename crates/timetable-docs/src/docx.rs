//! Per-group schedule document ("Расписание занятий группы").

use docx_rs::{
  AlignmentType, Docx, Paragraph, Run, Table, TableCell, TableRow,
};

use crate::{EntryView, Error, LETTERHEAD, Result};

const TABLE_HEADERS: [&str; 6] =
  ["Дата", "Время", "Дисциплина", "Преподаватель", "Аудитория", "Тип занятия"];

const SIGNATURES: [&str; 3] = [
  "Составил: __________________ /____________________/",
  "Проверил: __________________ /____________________/",
  "Утвердил: __________________ /____________________/",
];

/// Render the schedule document for one group.
///
/// The period line is drawn from the earliest and latest dates present in
/// `entries`; with no dates it degrades to "the academic year". An empty
/// entry set produces a table with a single placeholder row.
pub fn group_schedule_docx(
  group_name: &str,
  entries: &[EntryView],
  year: i32,
) -> Result<Vec<u8>> {
  let mut doc = Docx::new();

  for line in LETTERHEAD {
    doc = doc.add_paragraph(centered_bold(line, 24));
  }
  doc = doc.add_paragraph(Paragraph::new());

  doc = doc.add_paragraph(centered_bold(
    &format!("РАСПИСАНИЕ ЗАНЯТИЙ ГРУППЫ {group_name}"),
    28,
  ));
  doc = doc.add_paragraph(centered_bold(&period_line(entries, year), 24));
  doc = doc.add_paragraph(Paragraph::new());

  doc = doc.add_table(schedule_table(entries));
  doc = doc.add_paragraph(Paragraph::new());

  for line in SIGNATURES {
    doc = doc.add_paragraph(
      Paragraph::new().add_run(Run::new().add_text(line).bold().size(24)),
    );
  }

  let mut cursor = std::io::Cursor::new(Vec::new());
  doc
    .build()
    .pack(&mut cursor)
    .map_err(|e| Error::Docx(e.to_string()))?;
  Ok(cursor.into_inner())
}

fn centered_bold(text: &str, half_points: usize) -> Paragraph {
  Paragraph::new()
    .align(AlignmentType::Center)
    .add_run(Run::new().add_text(text).bold().size(half_points))
}

fn period_line(entries: &[EntryView], year: i32) -> String {
  let mut dates: Vec<&str> = entries.iter().filter_map(|e| e.date.as_deref()).collect();
  dates.sort_unstable();

  match (dates.first(), dates.last()) {
    (Some(start), Some(end)) => {
      format!("с \"{start}\" по \"{end}\" {year} г.")
    }
    _ => format!("на {year} учебный год"),
  }
}

fn schedule_table(entries: &[EntryView]) -> Table {
  let mut rows = vec![TableRow::new(
    TABLE_HEADERS
      .iter()
      .map(|h| cell(h, true))
      .collect::<Vec<_>>(),
  )];

  if entries.is_empty() {
    rows.push(TableRow::new(
      TABLE_HEADERS.iter().map(|_| cell("—", false)).collect::<Vec<_>>(),
    ));
  } else {
    for entry in entries {
      rows.push(TableRow::new(vec![
        cell(entry.date(), false),
        cell(entry.time(), false),
        cell(entry.subject(), false),
        cell(entry.teacher(), false),
        cell(entry.room(), false),
        cell(entry.kind(), false),
      ]));
    }
  }

  Table::new(rows)
}

fn cell(text: &str, bold: bool) -> TableCell {
  let mut run = Run::new().add_text(text);
  if bold {
    run = run.bold();
  }
  TableCell::new()
    .add_paragraph(Paragraph::new().align(AlignmentType::Center).add_run(run))
}
