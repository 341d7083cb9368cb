//! # lawpoint-store
//!
//! Document store behind the Lawpoint gateway, backed by SQLite.
//!
//! Records live as schema-less JSON documents in six named collections and
//! are addressed by their opaque string `id`. The crate exposes a synchronous
//! `Database` handle that wraps a `rusqlite::Connection`; the document
//! operations mirror what the gateway needs: insert, find, field-level set
//! with explicit unset, array push, array-element update and delete.

pub mod collections;
pub mod database;
pub mod documents;
pub mod migrations;

mod error;

pub use collections::Collection;
pub use database::Database;
pub use error::{Result, StoreError};
