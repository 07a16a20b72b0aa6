//! HTTP API for the timetable administration backend.
//!
//! Exposes an axum [`Router`] backed by any
//! [`timetable_core::store::ScheduleStore`]. Transport concerns (bind
//! address, TLS termination) are the caller's responsibility; the binary
//! in `main.rs` wires the router to a SQLite store and a TCP listener.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = timetable_server::router(Arc::new(store));
//! ```

pub mod entries;
pub mod error;
pub mod export;
pub mod import;
pub mod refs;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use serde::Deserialize;
use timetable_core::store::ScheduleStore;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `TIMETABLE_`-prefixed environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:    String,
  #[serde(default = "default_port")]
  pub port:    u16,
  #[serde(default = "default_db_path")]
  pub db_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8000 }

fn default_db_path() -> PathBuf { PathBuf::from("timetable.db") }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The four reference collections share one set of handlers; the literal
/// `itog`, `import` and `export_*` routes take priority over the
/// `{collection}` captures.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: ScheduleStore + 'static,
{
  Router::new()
    // Schedule entries
    .route("/api/itog", get(entries::list::<S>).post(entries::create::<S>))
    .route(
      "/api/itog/{id}",
      put(entries::update::<S>).delete(entries::delete_one::<S>),
    )
    // Import & export
    .route("/api/import", post(import::handler::<S>))
    .route("/api/export", get(export::table::<S>))
    .route("/api/export_excel", get(export::excel::<S>))
    .route("/api/export_word", get(export::word::<S>))
    .route("/api/export_pdf", get(export::pdf::<S>))
    // Reference collections: groups, objects, preps, auditorii
    .route("/api/{collection}", get(refs::list::<S>).post(refs::create::<S>))
    .route(
      "/api/{collection}/{id}",
      put(refs::rename::<S>).delete(refs::delete_one::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests;
