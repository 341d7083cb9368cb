use lawpoint_shared::types::{RequestStatus, UserRole};
use lawpoint_shared::LawpointError;
use thiserror::Error;

/// Errors returned by the HTTP gateway client.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid gateway response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),
}

/// Errors returned by marketplace commands.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("No user is signed in")]
    NotSignedIn,

    #[error("This action requires a {expected} account")]
    WrongRole { expected: UserRole },

    #[error("Unknown {kind}: {id}")]
    UnknownEntity { kind: &'static str, id: String },

    #[error("Request {id} is already {status}")]
    RequestNotPending { id: String, status: RequestStatus },

    #[error("A review was already submitted for case {case_id}")]
    ReviewAlreadySubmitted { case_id: String },

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Session cache error: {0}")]
    Session(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Shared(#[from] LawpointError),
}

impl ClientError {
    pub(crate) fn unknown(kind: &'static str, id: impl Into<String>) -> Self {
        Self::UnknownEntity {
            kind,
            id: id.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
