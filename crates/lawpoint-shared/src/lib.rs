//! # lawpoint-shared
//!
//! Records, enums and wire bodies shared by the Lawpoint store, gateway and
//! client crates. Nothing in here performs I/O.

pub mod api;
pub mod constants;
pub mod error;
pub mod models;
pub mod patch;
pub mod types;

pub use error::LawpointError;
