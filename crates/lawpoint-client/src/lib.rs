//! # lawpoint-client
//!
//! Domain state of the Lawpoint marketplace.
//!
//! [`Marketplace`] owns the in-memory lists of clients, lawyers, cases,
//! chats, requests and posts. Its command methods (see [`commands`]) mutate
//! that state synchronously and queue a [`MirrorCommand`] for each change.
//! A background worker started by [`spawn_mirror`] forwards the queue to the
//! gateway through the [`Gateway`] trait; failures are logged and never
//! reconciled.

pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod mirror;
pub mod notifications;
pub mod session;
pub mod state;
pub mod views;

use tracing_subscriber::{fmt, EnvFilter};

pub use config::ClientConfig;
pub use error::{ClientError, GatewayError, Result};
pub use gateway::{Gateway, HttpGateway};
pub use mirror::{spawn_mirror, MirrorCommand};
pub use state::Marketplace;

/// Install a `tracing` subscriber honouring `RUST_LOG`. Call once from the
/// embedding binary; a second call is a no-op.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lawpoint_client=debug,warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
