//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("import error: {0}")]
  Import(#[from] timetable_import::Error),

  #[error("document error: {0}")]
  Docs(#[from] timetable_docs::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a store error, surfacing not-found and validation conditions
  /// buried anywhere in its source chain as the right status code.
  pub fn from_store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(&e);
    while let Some(err) = current {
      if let Some(core) = err.downcast_ref::<timetable_core::Error>() {
        return match core {
          timetable_core::Error::RefNotFound { .. }
          | timetable_core::Error::EntryNotFound(_) => {
            ApiError::NotFound(core.to_string())
          }
        };
      }
      current = err.source();
    }
    ApiError::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      // Structural import problems are the client's fault; the rest is ours.
      ApiError::Import(e) if e.is_structural() => {
        (StatusCode::BAD_REQUEST, e.to_string())
      }
      ApiError::Import(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
      ApiError::Docs(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
