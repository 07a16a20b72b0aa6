use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use timetable_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use super::router;

// ── Helpers ──────────────────────────────────────────────────────────────────

async fn store() -> Arc<SqliteStore> {
  Arc::new(SqliteStore::open_in_memory().await.unwrap())
}

/// Send one request through a fresh router over `store`.
async fn send(
  store: Arc<SqliteStore>,
  method: &str,
  uri: &str,
  form: Option<&str>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if form.is_some() {
    builder = builder
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
  }
  let req = builder
    .body(Body::from(form.unwrap_or("").to_string()))
    .unwrap();
  router(store).oneshot(req).await.unwrap()
}

async fn body_bytes(resp: Response) -> Vec<u8> {
  axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap()
    .to_vec()
}

async fn json_body(resp: Response) -> Value {
  serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

/// Create a reference row and return its id.
async fn create_ref(store: &Arc<SqliteStore>, collection: &str, form: &str) -> String {
  let resp = send(
    store.clone(),
    "POST",
    &format!("/api/{collection}"),
    Some(form),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  json_body(resp).await["id"].as_str().unwrap().to_string()
}

// ── Reference collections ────────────────────────────────────────────────────

#[tokio::test]
async fn create_group_then_list_returns_it() {
  let store = store().await;

  let resp =
    send(store.clone(), "POST", "/api/groups", Some("name=П-21")).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = json_body(resp).await;
  assert!(created["id"].is_string(), "id travels as a string: {created}");
  assert_eq!(created["name"], "П-21");

  let resp = send(store, "GET", "/api/groups", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let list = json_body(resp).await;
  assert_eq!(list.as_array().unwrap().len(), 1);
  assert_eq!(list[0]["name"], "П-21");
}

#[tokio::test]
async fn preps_and_auditorii_use_their_own_field_names() {
  let store = store().await;

  let resp =
    send(store.clone(), "POST", "/api/preps", Some("fio=Иванов И.И.")).await;
  let prep = json_body(resp).await;
  assert_eq!(prep["fio"], "Иванов И.И.");
  assert!(prep.get("name").is_none());

  let resp =
    send(store.clone(), "POST", "/api/auditorii", Some("number=203")).await;
  let room = json_body(resp).await;
  assert_eq!(room["number"], "203");
}

#[tokio::test]
async fn create_without_value_is_rejected() {
  let store = store().await;
  let resp = send(store.clone(), "POST", "/api/groups", Some("")).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = json_body(resp).await;
  assert!(
    body["error"].as_str().unwrap().contains("name"),
    "error names the missing field: {body}"
  );

  // Whitespace-only counts as empty too.
  let resp = send(store, "POST", "/api/preps", Some("fio=  ")).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_collection_is_404() {
  let store = store().await;
  let resp = send(store, "GET", "/api/classrooms", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_name_substring() {
  let store = store().await;
  create_ref(&store, "groups", "name=П-21").await;
  create_ref(&store, "groups", "name=Э-11").await;

  let resp = send(store, "GET", "/api/groups?name=%D0%BF", None).await; // "п"
  let list = json_body(resp).await;
  assert_eq!(list.as_array().unwrap().len(), 1);
  assert_eq!(list[0]["name"], "П-21");
}

#[tokio::test]
async fn rename_group() {
  let store = store().await;
  let id = create_ref(&store, "groups", "name=П-21").await;

  let resp = send(
    store.clone(),
    "PUT",
    &format!("/api/groups/{id}"),
    Some("name=П-22"),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["name"], "П-22");

  let list = json_body(send(store, "GET", "/api/groups", None).await).await;
  assert_eq!(list[0]["name"], "П-22");
}

#[tokio::test]
async fn put_without_value_returns_row_unchanged() {
  let store = store().await;
  let id = create_ref(&store, "groups", "name=П-21").await;

  let resp =
    send(store, "PUT", &format!("/api/groups/{id}"), Some("")).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["name"], "П-21");
}

#[tokio::test]
async fn rename_unknown_id_is_404() {
  let store = store().await;
  let resp =
    send(store, "PUT", "/api/groups/999", Some("name=П-21")).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_ok_and_removes_the_row() {
  let store = store().await;
  let id = create_ref(&store, "objects", "name=Математика").await;

  let resp =
    send(store.clone(), "DELETE", &format!("/api/objects/{id}"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["ok"], true);

  let list = json_body(send(store, "GET", "/api/objects", None).await).await;
  assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_unknown_id_is_404() {
  let store = store().await;
  let resp = send(store, "DELETE", "/api/auditorii/999", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Schedule entries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn create_entry_uses_wire_field_names() {
  let store = store().await;
  let group_id = create_ref(&store, "groups", "name=П-21").await;

  let resp = send(
    store,
    "POST",
    "/api/itog",
    Some(&format!(
      "date=2025-09-01&time=08:30&type=лекция&group_id={group_id}"
    )),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let entry = json_body(resp).await;
  assert!(entry["id"].is_string());
  assert_eq!(entry["date"], "2025-09-01");
  assert_eq!(entry["type"], "лекция");
  assert_eq!(entry["group_id"], group_id);
  // Unset keys are present and null, under their wire names.
  assert!(entry["object_id"].is_null());
  assert!(entry["prep_id"].is_null());
  assert!(entry["aud_id"].is_null());
}

#[tokio::test]
async fn non_integer_id_field_is_rejected() {
  let store = store().await;
  let resp =
    send(store, "POST", "/api/itog", Some("group_id=abc")).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_group_orphans_its_entries() {
  let store = store().await;
  let group_id = create_ref(&store, "groups", "name=П-21").await;
  send(
    store.clone(),
    "POST",
    "/api/itog",
    Some(&format!("date=2025-09-01&group_id={group_id}")),
  )
  .await;

  let resp =
    send(store.clone(), "DELETE", &format!("/api/groups/{group_id}"), None)
      .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let list = json_body(send(store, "GET", "/api/itog", None).await).await;
  assert_eq!(list.as_array().unwrap().len(), 1, "entry survives");
  assert!(list[0]["group_id"].is_null(), "foreign key nulled: {list}");
}

#[tokio::test]
async fn list_entries_filters_by_date_range_and_kind() {
  let store = store().await;
  for (date, kind) in [
    ("2025-09-01", "seminar"),
    ("2025-09-10", "seminar"),
    ("2025-10-01", "exam"),
  ] {
    send(
      store.clone(),
      "POST",
      "/api/itog",
      Some(&format!("date={date}&type={kind}")),
    )
    .await;
  }

  let resp = send(
    store.clone(),
    "GET",
    "/api/itog?date_from=2025-09-01&date_to=2025-09-30",
    None,
  )
  .await;
  let list = json_body(resp).await;
  assert_eq!(list.as_array().unwrap().len(), 2);

  let resp = send(store, "GET", "/api/itog?type=exam", None).await;
  let list = json_body(resp).await;
  assert_eq!(list.as_array().unwrap().len(), 1);
  assert_eq!(list[0]["date"], "2025-10-01");
}

#[tokio::test]
async fn update_entry_patches_only_present_fields() {
  let store = store().await;
  let resp = send(
    store.clone(),
    "POST",
    "/api/itog",
    Some("date=2025-09-01&time=08:30"),
  )
  .await;
  let id = json_body(resp).await["id"].as_str().unwrap().to_string();

  let resp = send(
    store,
    "PUT",
    &format!("/api/itog/{id}"),
    Some("date=2025-09-02"),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let entry = json_body(resp).await;
  assert_eq!(entry["date"], "2025-09-02");
  assert_eq!(entry["time"], "08:30", "absent field untouched");
}

#[tokio::test]
async fn update_unknown_entry_is_404() {
  let store = store().await;
  let resp =
    send(store, "PUT", "/api/itog/999", Some("date=2025-09-01")).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_entry_returns_ok_true() {
  let store = store().await;
  let resp =
    send(store.clone(), "POST", "/api/itog", Some("date=2025-09-01")).await;
  let id = json_body(resp).await["id"].as_str().unwrap().to_string();

  let resp =
    send(store.clone(), "DELETE", &format!("/api/itog/{id}"), None).await;
  assert_eq!(json_body(resp).await["ok"], true);

  let list = json_body(send(store, "GET", "/api/itog", None).await).await;
  assert!(list.as_array().unwrap().is_empty());
}

// ── Import ───────────────────────────────────────────────────────────────────

const BOUNDARY: &str = "X-TIMETABLE-TEST";
const XLSX_MIME: &str =
  "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn workbook_bytes(header: &[&str], rows: &[&[&str]]) -> Vec<u8> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  for (col, title) in header.iter().enumerate() {
    sheet.write_string(0, col as u16, *title).unwrap();
  }
  for (r, row) in rows.iter().enumerate() {
    for (col, cell) in row.iter().enumerate() {
      sheet.write_string(r as u32 + 1, col as u16, *cell).unwrap();
    }
  }
  workbook.save_to_buffer().unwrap()
}

fn multipart_body(content_type: &str, file: &[u8]) -> Vec<u8> {
  let mut body = Vec::new();
  body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
  body.extend_from_slice(
    format!(
      "Content-Disposition: form-data; name=\"file\"; \
       filename=\"schedule.xlsx\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .as_bytes(),
  );
  body.extend_from_slice(file);
  body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
  body
}

async fn send_import(store: Arc<SqliteStore>, body: Vec<u8>) -> Response {
  let req = Request::builder()
    .method("POST")
    .uri("/api/import")
    .header(
      header::CONTENT_TYPE,
      format!("multipart/form-data; boundary={BOUNDARY}"),
    )
    .body(Body::from(body))
    .unwrap();
  router(store).oneshot(req).await.unwrap()
}

const IMPORT_HEADER: [&str; 7] =
  ["date", "time", "subject", "group", "prepod", "auditorium", "type"];

#[tokio::test]
async fn import_creates_entries_and_reference_rows() {
  let store = store().await;
  let file = workbook_bytes(
    &IMPORT_HEADER,
    &[
      &["2025-09-01", "08:30", "Математика", "П-21", "Иванов И.И.", "203", "лекция"],
      &["2025-09-01", "10:10", "Физика", "П-21", "Петрова А.А.", "204", "практика"],
    ],
  );

  let resp =
    send_import(store.clone(), multipart_body(XLSX_MIME, &file)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body["count"], 2);
  assert_eq!(body["created"].as_array().unwrap().len(), 2);

  // Both rows named the same group; exactly one row was created for it.
  let groups =
    json_body(send(store.clone(), "GET", "/api/groups", None).await).await;
  assert_eq!(groups.as_array().unwrap().len(), 1);
  let preps = json_body(send(store, "GET", "/api/preps", None).await).await;
  assert_eq!(preps.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn import_with_wrong_content_type_is_400() {
  let store = store().await;
  let file = workbook_bytes(&IMPORT_HEADER, &[]);
  let resp =
    send_import(store, multipart_body("text/plain", &file)).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn import_with_missing_column_is_400() {
  let store = store().await;
  // No "group" column.
  let file = workbook_bytes(
    &["date", "time", "subject", "prepod", "auditorium", "type"],
    &[],
  );
  let resp =
    send_import(store.clone(), multipart_body(XLSX_MIME, &file)).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = json_body(resp).await;
  assert!(
    body["error"].as_str().unwrap().contains("group"),
    "error names the column: {body}"
  );

  // Nothing was committed.
  let list = json_body(send(store, "GET", "/api/itog", None).await).await;
  assert!(list.as_array().unwrap().is_empty());
}

// ── Export ───────────────────────────────────────────────────────────────────

fn content_disposition(resp: &Response) -> String {
  resp
    .headers()
    .get(header::CONTENT_DISPOSITION)
    .unwrap()
    .to_str()
    .unwrap()
    .to_string()
}

#[tokio::test]
async fn export_excel_sets_attachment_headers() {
  let store = store().await;
  send(store.clone(), "POST", "/api/itog", Some("date=2025-09-01")).await;

  let resp = send(store, "GET", "/api/export_excel", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let ct = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
  assert!(ct.contains("spreadsheetml"), "Content-Type: {ct}");
  let cd = content_disposition(&resp);
  assert!(cd.starts_with("attachment; filename*=UTF-8''"), "{cd}");

  let bytes = body_bytes(resp).await;
  assert_eq!(&bytes[..2], b"PK", "xlsx is a zip container");
}

#[tokio::test]
async fn export_pdf_returns_a_pdf_document() {
  let store = store().await;
  let resp = send(store, "GET", "/api/export_pdf", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(
    resp.headers()[header::CONTENT_TYPE].to_str().unwrap(),
    "application/pdf"
  );
  let bytes = body_bytes(resp).await;
  assert_eq!(&bytes[..5], b"%PDF-");
}

#[tokio::test]
async fn export_word_requires_an_existing_group() {
  let store = store().await;

  let resp = send(store.clone(), "GET", "/api/export_word", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(
    store,
    "GET",
    "/api/export_word?group=%D0%9F-21", // "П-21"
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_word_filename_carries_the_group_name() {
  let store = store().await;
  create_ref(&store, "groups", "name=П-21").await;

  let resp = send(store, "GET", "/api/export_word?group=%D0%9F-21", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let cd = content_disposition(&resp);
  // "П" percent-encoded; the group name survives into the attachment name.
  assert!(cd.contains("%D0%9F"), "{cd}");
}

#[tokio::test]
async fn export_word_empty_date_params_impose_no_bound() {
  let store = store().await;
  let group_id = create_ref(&store, "groups", "name=П-21").await;
  send(
    store.clone(),
    "POST",
    "/api/itog",
    Some(&format!("date=2025-09-01&group_id={group_id}")),
  )
  .await;

  let plain = send(
    store.clone(),
    "GET",
    "/api/export_word?group=%D0%9F-21",
    None,
  )
  .await;
  let bounded = send(
    store,
    "GET",
    "/api/export_word?group=%D0%9F-21&date_start=&date_end=",
    None,
  )
  .await;
  assert_eq!(bounded.status(), StatusCode::OK);
  assert_eq!(
    body_bytes(bounded).await,
    body_bytes(plain).await,
    "empty date params must not filter out the group's entries"
  );
}

#[tokio::test]
async fn flat_export_round_trips_through_import() {
  let store = store().await;
  let group_id = create_ref(&store, "groups", "name=П-21").await;
  let prep_id = create_ref(&store, "preps", "fio=Иванов И.И.").await;
  send(
    store.clone(),
    "POST",
    "/api/itog",
    Some(&format!(
      "date=2025-09-01&time=08:30&type=лекция&group_id={group_id}&prep_id={prep_id}"
    )),
  )
  .await;

  let resp = send(store, "GET", "/api/export", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let cd = content_disposition(&resp);
  assert!(cd.contains("itog"), "{cd}");
  let file = body_bytes(resp).await;
  assert_eq!(&file[..2], b"PK");

  // The dump shares the import column set, so it imports as-is.
  let fresh = self::store().await;
  let resp =
    send_import(fresh.clone(), multipart_body(XLSX_MIME, &file)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["count"], 1);

  let groups =
    json_body(send(fresh.clone(), "GET", "/api/groups", None).await).await;
  assert_eq!(groups[0]["name"], "П-21");
  let preps = json_body(send(fresh, "GET", "/api/preps", None).await).await;
  assert_eq!(preps[0]["fio"], "Иванов И.И.");
}

#[tokio::test]
async fn export_word_renders_for_a_known_group() {
  let store = store().await;
  let group_id = create_ref(&store, "groups", "name=П-21").await;
  send(
    store.clone(),
    "POST",
    "/api/itog",
    Some(&format!("date=2025-09-01&time=08:30&group_id={group_id}")),
  )
  .await;

  let resp = send(
    store,
    "GET",
    "/api/export_word?group=%D0%9F-21",
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let ct = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
  assert!(ct.contains("wordprocessingml"), "Content-Type: {ct}");
  let bytes = body_bytes(resp).await;
  assert_eq!(&bytes[..2], b"PK", "docx is a zip container");
}
