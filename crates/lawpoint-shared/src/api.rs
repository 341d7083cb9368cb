//! Request and response bodies exchanged with the HTTP gateway.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Case, Chat, ChatMessage, Client, ClientRequest, Lawyer, LawyerUpPost};
use crate::types::{RequestStatus, UserRole};

/// Body of `POST /api/register` and `POST /api/update-user`.
///
/// `user` stays untyped: the gateway stores whatever document it is given in
/// the collection selected by `role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: Value,
    pub role: UserRole,
}

/// Body of `DELETE /api/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteUserBody {
    pub id: String,
    pub role: UserRole,
}

/// Body of `PATCH /api/requests/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: RequestStatus,
}

/// Body of `POST /api/messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendMessageBody {
    pub chat_id: String,
    pub message: ChatMessage,
}

/// Response of `GET /api/initial-data`: every collection in full.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialData {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub lawyers: Vec<Lawyer>,
    #[serde(default)]
    pub cases: Vec<Case>,
    #[serde(default)]
    pub chats: Vec<Chat>,
    #[serde(default)]
    pub requests: Vec<ClientRequest>,
    #[serde(default)]
    pub posts: Vec<LawyerUpPost>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub const OK: Self = Self { success: true };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
