//! Port to the HTTP gateway and its reqwest implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use lawpoint_shared::api::{AppendMessageBody, DeleteUserBody, InitialData, StatusBody, UserEnvelope};
use lawpoint_shared::models::{Case, Chat, ClientRequest, LawyerUpPost};
use lawpoint_shared::patch::{CasePatch, MessagePatch, PostPatch};
use lawpoint_shared::types::RequestStatus;

use crate::error::GatewayError;

/// One method per gateway endpoint.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn fetch_initial_data(&self) -> Result<InitialData, GatewayError>;

    async fn register(&self, body: &UserEnvelope) -> Result<(), GatewayError>;
    async fn update_user(&self, body: &UserEnvelope) -> Result<(), GatewayError>;
    async fn delete_user(&self, body: &DeleteUserBody) -> Result<(), GatewayError>;

    async fn create_request(&self, request: &ClientRequest) -> Result<(), GatewayError>;
    async fn update_request_status(&self, id: &str, status: RequestStatus) -> Result<(), GatewayError>;

    async fn create_case(&self, case: &Case) -> Result<(), GatewayError>;
    async fn update_case(&self, id: &str, patch: &CasePatch) -> Result<(), GatewayError>;

    async fn create_chat(&self, chat: &Chat) -> Result<(), GatewayError>;
    async fn append_message(&self, body: &AppendMessageBody) -> Result<(), GatewayError>;
    async fn update_message(
        &self,
        chat_id: &str,
        message_id: &str,
        patch: &MessagePatch,
    ) -> Result<(), GatewayError>;

    async fn create_post(&self, post: &LawyerUpPost) -> Result<(), GatewayError>;
    async fn update_post(&self, id: &str, patch: &PostPatch) -> Result<(), GatewayError>;
    async fn delete_post(&self, id: &str) -> Result<(), GatewayError>;
}

/// `GET /initial-data` before its documents are checked one by one.
#[derive(Debug, Default, Deserialize)]
struct RawInitialData {
    #[serde(default)]
    clients: Vec<Value>,
    #[serde(default)]
    lawyers: Vec<Value>,
    #[serde(default)]
    cases: Vec<Value>,
    #[serde(default)]
    chats: Vec<Value>,
    #[serde(default)]
    requests: Vec<Value>,
    #[serde(default)]
    posts: Vec<Value>,
}

impl RawInitialData {
    fn into_typed(self) -> InitialData {
        InitialData {
            clients: decode_documents("clients", self.clients),
            lawyers: decode_documents("lawyers", self.lawyers),
            cases: decode_documents("cases", self.cases),
            chats: decode_documents("chats", self.chats),
            requests: decode_documents("requests", self.requests),
            posts: decode_documents("posts", self.posts),
        }
    }
}

/// Keep the documents that match `T`. The store enforces no schema, so a
/// malformed document is logged and skipped instead of failing the batch.
fn decode_documents<T: DeserializeOwned>(collection: &'static str, docs: Vec<Value>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            match serde_json::from_value(doc) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(collection, id = %id, error = %e, "Skipping malformed document");
                    None
                }
            }
        })
        .collect()
}

/// [`Gateway`] over JSON/HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpGateway {
    /// `base_url` includes the `/api` prefix, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| GatewayError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// Base URL extended by `segments`, each percent-encoded as a single
    /// path segment so ids containing `/` or `?` stay in place.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<(), GatewayError> {
        let mut request = self.client.request(method, self.endpoint(segments)?);
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch_initial_data(&self) -> Result<InitialData, GatewayError> {
        let resp = self
            .client
            .get(self.endpoint(&["initial-data"])?)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = resp.bytes().await?;
        let raw: RawInitialData = serde_json::from_slice(&bytes)?;
        Ok(raw.into_typed())
    }

    async fn register(&self, body: &UserEnvelope) -> Result<(), GatewayError> {
        self.send(Method::POST, &["register"], Some(body)).await
    }

    async fn update_user(&self, body: &UserEnvelope) -> Result<(), GatewayError> {
        self.send(Method::POST, &["update-user"], Some(body)).await
    }

    async fn delete_user(&self, body: &DeleteUserBody) -> Result<(), GatewayError> {
        self.send(Method::DELETE, &["users"], Some(body)).await
    }

    async fn create_request(&self, request: &ClientRequest) -> Result<(), GatewayError> {
        self.send(Method::POST, &["requests"], Some(request)).await
    }

    async fn update_request_status(&self, id: &str, status: RequestStatus) -> Result<(), GatewayError> {
        self.send(Method::PATCH, &["requests", id], Some(&StatusBody { status }))
            .await
    }

    async fn create_case(&self, case: &Case) -> Result<(), GatewayError> {
        self.send(Method::POST, &["cases"], Some(case)).await
    }

    async fn update_case(&self, id: &str, patch: &CasePatch) -> Result<(), GatewayError> {
        self.send(Method::PATCH, &["cases", id], Some(patch)).await
    }

    async fn create_chat(&self, chat: &Chat) -> Result<(), GatewayError> {
        self.send(Method::POST, &["chats"], Some(chat)).await
    }

    async fn append_message(&self, body: &AppendMessageBody) -> Result<(), GatewayError> {
        self.send(Method::POST, &["messages"], Some(body)).await
    }

    async fn update_message(
        &self,
        chat_id: &str,
        message_id: &str,
        patch: &MessagePatch,
    ) -> Result<(), GatewayError> {
        self.send(Method::PATCH, &["messages", chat_id, message_id], Some(patch))
            .await
    }

    async fn create_post(&self, post: &LawyerUpPost) -> Result<(), GatewayError> {
        self.send(Method::POST, &["posts"], Some(post)).await
    }

    async fn update_post(&self, id: &str, patch: &PostPatch) -> Result<(), GatewayError> {
        self.send(Method::PATCH, &["posts", id], Some(patch)).await
    }

    async fn delete_post(&self, id: &str) -> Result<(), GatewayError> {
        self.send::<()>(Method::DELETE, &["posts", id], None).await
    }
}
