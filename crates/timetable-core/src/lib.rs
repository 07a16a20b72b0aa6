//! Core types and trait definitions for the timetable store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod entity;
pub mod entry;
pub mod error;
pub mod id;
pub mod store;

pub use error::{Error, Result};
pub use id::EntityId;
