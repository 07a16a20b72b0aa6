//! Schedule-approval order ("Приказ об утверждении расписания занятий").
//!
//! A fixed-form administrative document: letterhead, order heading, body
//! text, schedule statistics and the director's signature line. Content
//! flows down the page and breaks to a new page when the remaining space
//! runs out.

use std::{
  fs::File,
  io::{BufWriter, Cursor},
};

use chrono::{Datelike as _, NaiveDate};
use printpdf::{
  BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
  PdfLayerReference,
};

use crate::{Error, LETTERHEAD, Result};

/// Aggregate numbers shown in the order's statistics block.
#[derive(Debug, Clone, Default)]
pub struct ScheduleStats {
  pub groups:   usize,
  pub teachers: usize,
  pub lessons:  usize,
  /// Earliest and latest entry dates, when any entry has one.
  pub date_min: Option<String>,
  pub date_max: Option<String>,
}

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const LEFT: f32 = 18.0;
const TOP: f32 = 272.0;
const LINE: f32 = 7.0;
const SMALL_LINE: f32 = 5.5;

/// Candidate TTF files with Cyrillic coverage; probed in order. When none
/// exists the built-in Helvetica is used, which renders Cyrillic
/// imperfectly — same degradation the paper-form predecessor had.
const FONT_PATHS: [&str; 4] = [
  "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
  "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
  "/usr/share/fonts/TTF/DejaVuSans.ttf",
  "C:/Windows/Fonts/arial.ttf",
];

const ORDER_BODY: [&str; 13] = [
  "В целях организации учебного процесса и обеспечения выполнения учебных планов,",
  "ПРИКАЗЫВАЮ:",
  "",
  "1. Утвердить расписание занятий для всех учебных групп колледжа",
  "   на {semester} семестр {year} учебного года.",
  "",
  "2. Диспетчеру учебной части довести утверждённое расписание до сведения",
  "   преподавателей и студентов.",
  "",
  "3. Контроль за исполнением настоящего приказа возложить на",
  "   заместителя директора по учебной работе ___________________ /Ф.И.О./",
  "",
  "Основание: утверждённый учебный план специальностей.",
];

/// Render the approval order. Always produces a document, even for an
/// empty schedule.
pub fn approval_order_pdf(stats: &ScheduleStats, today: NaiveDate) -> Result<Vec<u8>> {
  let (semester, academic_year) = semester_for(stats.date_min.as_deref(), today);

  let (doc, page, layer) = PdfDocument::new(
    "Приказ об утверждении расписания занятий",
    Mm(PAGE_W),
    Mm(PAGE_H),
    "layer",
  );
  let font = body_font(&doc)?;

  let mut writer = PageWriter {
    doc: &doc,
    layer: doc.get_page(page).get_layer(layer),
    y: TOP,
  };

  // Letterhead.
  writer.centered(LETTERHEAD[0], 14.0, &font);
  writer.down(LINE * 1.5);
  for line in &LETTERHEAD[1..] {
    writer.centered(line, 12.0, &font);
    writer.down(LINE);
  }
  writer.down(LINE);

  writer.centered("ПРИКАЗ", 16.0, &font);
  writer.down(LINE * 2.0);

  // Date on the left, order number placeholder on the right.
  writer.at_left(&russian_date_line(today), 12.0, &font);
  writer.at_x(PAGE_W - LEFT - 22.0, "№_____", 12.0, &font);
  writer.down(LINE * 1.5);

  writer.centered("г. Ликино-Дулёво", 12.0, &font);
  writer.down(LINE * 2.0);

  writer.centered("Об утверждении расписания занятий", 14.0, &font);
  writer.down(LINE);
  writer.centered(
    &format!("на {semester} семестр {academic_year} учебного года"),
    14.0,
    &font,
  );
  writer.down(LINE * 2.0);

  // Order body.
  for line in ORDER_BODY {
    writer.ensure_space(70.0);
    if line.is_empty() {
      writer.down(SMALL_LINE / 2.0);
      continue;
    }
    let line = line
      .replace("{semester}", semester)
      .replace("{year}", &academic_year);
    writer.at_left(&line, 12.0, &font);
    writer.down(SMALL_LINE);
  }
  writer.down(LINE);

  // Statistics block.
  writer.ensure_space(90.0);
  writer.at_left("Сведения о расписании:", 12.0, &font);
  writer.down(LINE);

  let mut stats_lines = vec![
    format!("• Количество учебных групп: {}", stats.groups),
    format!("• Количество преподавателей: {}", stats.teachers),
    format!("• Общее количество занятий: {}", stats.lessons),
  ];
  if let (Some(min), Some(max)) = (&stats.date_min, &stats.date_max) {
    stats_lines.push(format!("• Период действия: с {min} по {max}"));
  }
  for line in stats_lines {
    writer.at_x(LEFT + 4.0, &line, 10.0, &font);
    writer.down(SMALL_LINE);
  }
  writer.down(LINE);

  // Director's signature.
  writer.ensure_space(55.0);
  writer.at_left("Директор колледжа", 12.0, &font);
  writer.at_x(LEFT + 60.0, "_____________________", 12.0, &font);
  writer.at_x(LEFT + 115.0, "/Петров Р.М./", 12.0, &font);

  drop(writer);

  let mut buffer = BufWriter::new(Cursor::new(Vec::new()));
  doc
    .save(&mut buffer)
    .map_err(|e| Error::Pdf(e.to_string()))?;
  let bytes = buffer
    .into_inner()
    .map_err(|e| Error::Pdf(e.to_string()))?
    .into_inner();
  Ok(bytes)
}

// ─── Semester & dates ────────────────────────────────────────────────────────

/// Semester and academic year shown on the order.
///
/// September–December counts as the autumn semester of `year/year+1`;
/// anything else (including an unparseable or absent date) falls back on
/// today's month.
pub fn semester_for(
  date_min: Option<&str>,
  today: NaiveDate,
) -> (&'static str, String) {
  let month = date_min
    .and_then(|d| d.split('-').nth(1))
    .and_then(|m| m.parse::<u32>().ok())
    .filter(|m| (1..=12).contains(m))
    .unwrap_or(today.month());

  let year = today.year();
  if (9..=12).contains(&month) {
    ("осенний", format!("{}/{}", year, year + 1))
  } else {
    ("весенний", format!("{}/{}", year - 1, year))
  }
}

const RUSSIAN_MONTHS: [&str; 12] = [
  "января", "февраля", "марта", "апреля", "мая", "июня",
  "июля", "августа", "сентября", "октября", "ноября", "декабря",
];

fn russian_date_line(d: NaiveDate) -> String {
  format!(
    "от «{}» {} {} г.",
    d.day(),
    RUSSIAN_MONTHS[d.month0() as usize],
    d.year()
  )
}

// ─── Page writer ─────────────────────────────────────────────────────────────

/// Cursor over a growing PDF document: tracks the current layer and the
/// vertical position, opening a new page when space runs out.
struct PageWriter<'a> {
  doc:   &'a PdfDocumentReference,
  layer: PdfLayerReference,
  y:     f32,
}

impl PageWriter<'_> {
  fn down(&mut self, amount: f32) { self.y -= amount; }

  fn ensure_space(&mut self, needed: f32) {
    if self.y < needed {
      let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "layer");
      self.layer = self.doc.get_page(page).get_layer(layer);
      self.y = TOP;
    }
  }

  fn at_x(&self, x: f32, text: &str, size: f32, font: &IndirectFontRef) {
    self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
  }

  fn at_left(&self, text: &str, size: f32, font: &IndirectFontRef) {
    self.at_x(LEFT, text, size, font);
  }

  /// Approximate centring: no glyph metrics are available for external
  /// fonts, so the width is estimated from the character count.
  fn centered(&self, text: &str, size: f32, font: &IndirectFontRef) {
    let approx_width = text.chars().count() as f32 * size * 0.5 * 0.3528;
    let x = ((PAGE_W - approx_width) / 2.0).max(LEFT);
    self.at_x(x, text, size, font);
  }
}

fn body_font(doc: &PdfDocumentReference) -> Result<IndirectFontRef> {
  for path in FONT_PATHS {
    if let Ok(file) = File::open(path)
      && let Ok(font) = doc.add_external_font(file)
    {
      return Ok(font);
    }
  }
  doc
    .add_builtin_font(BuiltinFont::Helvetica)
    .map_err(|e| Error::Pdf(e.to_string()))
}
