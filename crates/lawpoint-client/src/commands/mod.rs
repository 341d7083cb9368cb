//! Marketplace command handlers.
//!
//! Each sub-module adds an `impl Marketplace` block for one domain. Every
//! command mutates local state first, then queues the matching
//! [`MirrorCommand`](crate::MirrorCommand).

pub mod account;
pub mod cases;
pub mod chat;
pub mod feed;
pub mod investigation;
pub mod requests;
pub mod reviews;
