//! Best-effort propagation of local state changes to the gateway.
//!
//! Domain commands push a [`MirrorCommand`] onto an unbounded channel after
//! committing their local change. [`spawn_mirror`] drains that channel in
//! FIFO order on a background task. A failed call is logged once and
//! dropped: there is no retry and no reconciliation.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use lawpoint_shared::api::{AppendMessageBody, DeleteUserBody, UserEnvelope};
use lawpoint_shared::models::{Case, Chat, ClientRequest, LawyerUpPost};
use lawpoint_shared::patch::{CasePatch, MessagePatch, PostPatch};
use lawpoint_shared::types::RequestStatus;

use crate::error::GatewayError;
use crate::gateway::Gateway;

pub type MirrorSender = mpsc::UnboundedSender<MirrorCommand>;
pub type MirrorReceiver = mpsc::UnboundedReceiver<MirrorCommand>;

/// A single gateway call, queued by a domain command.
#[derive(Debug, Clone, PartialEq)]
pub enum MirrorCommand {
    Register(UserEnvelope),
    UpdateUser(UserEnvelope),
    DeleteUser(DeleteUserBody),
    CreateRequest(ClientRequest),
    UpdateRequestStatus {
        id: String,
        status: RequestStatus,
    },
    CreateCase(Case),
    UpdateCase {
        id: String,
        patch: CasePatch,
    },
    CreateChat(Chat),
    AppendMessage(AppendMessageBody),
    UpdateMessage {
        chat_id: String,
        message_id: String,
        patch: MessagePatch,
    },
    CreatePost(LawyerUpPost),
    UpdatePost {
        id: String,
        patch: PostPatch,
    },
    DeletePost {
        id: String,
    },
}

impl MirrorCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register(_) => "register",
            Self::UpdateUser(_) => "update_user",
            Self::DeleteUser(_) => "delete_user",
            Self::CreateRequest(_) => "create_request",
            Self::UpdateRequestStatus { .. } => "update_request_status",
            Self::CreateCase(_) => "create_case",
            Self::UpdateCase { .. } => "update_case",
            Self::CreateChat(_) => "create_chat",
            Self::AppendMessage(_) => "append_message",
            Self::UpdateMessage { .. } => "update_message",
            Self::CreatePost(_) => "create_post",
            Self::UpdatePost { .. } => "update_post",
            Self::DeletePost { .. } => "delete_post",
        }
    }

    /// Perform the call against `gateway`.
    pub async fn apply(&self, gateway: &dyn Gateway) -> Result<(), GatewayError> {
        match self {
            Self::Register(body) => gateway.register(body).await,
            Self::UpdateUser(body) => gateway.update_user(body).await,
            Self::DeleteUser(body) => gateway.delete_user(body).await,
            Self::CreateRequest(request) => gateway.create_request(request).await,
            Self::UpdateRequestStatus { id, status } => {
                gateway.update_request_status(id, *status).await
            }
            Self::CreateCase(case) => gateway.create_case(case).await,
            Self::UpdateCase { id, patch } => gateway.update_case(id, patch).await,
            Self::CreateChat(chat) => gateway.create_chat(chat).await,
            Self::AppendMessage(body) => gateway.append_message(body).await,
            Self::UpdateMessage {
                chat_id,
                message_id,
                patch,
            } => gateway.update_message(chat_id, message_id, patch).await,
            Self::CreatePost(post) => gateway.create_post(post).await,
            Self::UpdatePost { id, patch } => gateway.update_post(id, patch).await,
            Self::DeletePost { id } => gateway.delete_post(id).await,
        }
    }
}

/// Start the mirror worker. Returns the sender to hand to
/// [`Marketplace::with_mirror`](crate::Marketplace::with_mirror) and the
/// worker's join handle. The worker stops once every sender is dropped.
pub fn spawn_mirror(gateway: Arc<dyn Gateway>) -> (MirrorSender, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(mirror_loop(gateway, rx));
    (tx, handle)
}

async fn mirror_loop(gateway: Arc<dyn Gateway>, mut rx: MirrorReceiver) {
    while let Some(command) = rx.recv().await {
        let name = command.name();
        match command.apply(gateway.as_ref()).await {
            Ok(()) => debug!(command = name, "Mirrored to gateway"),
            Err(e) => warn!(command = name, error = %e, "Mirror call failed, local state kept"),
        }
    }
    info!("Mirror worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use lawpoint_shared::api::InitialData;

    /// Records the order of calls and fails the ones named in `fail`.
    #[derive(Default)]
    struct RecordingGateway {
        calls: Mutex<Vec<String>>,
        fail: Vec<&'static str>,
    }

    impl RecordingGateway {
        fn record(&self, name: &str) -> Result<(), GatewayError> {
            self.calls.lock().unwrap().push(name.to_string());
            if self.fail.iter().any(|f| *f == name) {
                return Err(GatewayError::Status {
                    status: 500,
                    body: "{\"error\":\"down\"}".into(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Gateway for RecordingGateway {
        async fn fetch_initial_data(&self) -> Result<InitialData, GatewayError> {
            Ok(InitialData::default())
        }
        async fn register(&self, _: &UserEnvelope) -> Result<(), GatewayError> {
            self.record("register")
        }
        async fn update_user(&self, _: &UserEnvelope) -> Result<(), GatewayError> {
            self.record("update_user")
        }
        async fn delete_user(&self, _: &DeleteUserBody) -> Result<(), GatewayError> {
            self.record("delete_user")
        }
        async fn create_request(&self, _: &ClientRequest) -> Result<(), GatewayError> {
            self.record("create_request")
        }
        async fn update_request_status(&self, id: &str, _: RequestStatus) -> Result<(), GatewayError> {
            self.record(&format!("update_request_status:{id}"))
        }
        async fn create_case(&self, _: &Case) -> Result<(), GatewayError> {
            self.record("create_case")
        }
        async fn update_case(&self, _: &str, _: &CasePatch) -> Result<(), GatewayError> {
            self.record("update_case")
        }
        async fn create_chat(&self, _: &Chat) -> Result<(), GatewayError> {
            self.record("create_chat")
        }
        async fn append_message(&self, _: &AppendMessageBody) -> Result<(), GatewayError> {
            self.record("append_message")
        }
        async fn update_message(&self, _: &str, _: &str, _: &MessagePatch) -> Result<(), GatewayError> {
            self.record("update_message")
        }
        async fn create_post(&self, _: &LawyerUpPost) -> Result<(), GatewayError> {
            self.record("create_post")
        }
        async fn update_post(&self, _: &str, _: &PostPatch) -> Result<(), GatewayError> {
            self.record("update_post")
        }
        async fn delete_post(&self, id: &str) -> Result<(), GatewayError> {
            self.record(&format!("delete_post:{id}"))
        }
    }

    #[tokio::test]
    async fn test_worker_applies_in_order_and_survives_failures() {
        let gateway = Arc::new(RecordingGateway {
            fail: vec!["delete_post:post-1"],
            ..Default::default()
        });
        let (tx, handle) = spawn_mirror(gateway.clone());

        tx.send(MirrorCommand::DeletePost { id: "post-1".into() }).unwrap();
        tx.send(MirrorCommand::UpdateRequestStatus {
            id: "req-1".into(),
            status: RequestStatus::Rejected,
        })
        .unwrap();
        tx.send(MirrorCommand::DeletePost { id: "post-2".into() }).unwrap();
        drop(tx);

        handle.await.unwrap();

        let calls = gateway.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "delete_post:post-1".to_string(),
                "update_request_status:req-1".to_string(),
                "delete_post:post-2".to_string(),
            ]
        );
    }

    #[test]
    fn test_command_names() {
        let cmd = MirrorCommand::UpdateMessage {
            chat_id: "chat-1".into(),
            message_id: "msg-1".into(),
            patch: MessagePatch::default(),
        };
        assert_eq!(cmd.name(), "update_message");
    }
}
