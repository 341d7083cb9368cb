use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    http::Method,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{Map, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use lawpoint_shared::api::{
    Ack, AppendMessageBody, DeleteUserBody, HealthResponse, StatusBody, UserEnvelope,
};
use lawpoint_shared::patch::MessagePatch;
use lawpoint_store::{Collection, Database};

use crate::config::ServerConfig;
use crate::error::ServerError;

type Body<T> = Result<Json<T>, JsonRejection>;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            config: Arc::new(config),
        }
    }

    fn with_db<T>(
        &self,
        f: impl FnOnce(&Database) -> lawpoint_store::Result<T>,
    ) -> Result<T, ServerError> {
        let db = self
            .db
            .lock()
            .map_err(|_| ServerError::Internal("database lock poisoned".into()))?;
        Ok(f(&db)?)
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/api/initial-data", get(initial_data))
        .route("/api/register", post(register))
        .route("/api/users", axum::routing::delete(delete_user))
        .route("/api/update-user", post(update_user))
        .route("/api/requests", post(create_request))
        .route("/api/requests/{id}", patch(update_request_status))
        .route("/api/cases", post(create_case))
        .route("/api/cases/{id}", patch(update_case))
        .route("/api/chats", post(create_chat))
        .route("/api/messages", post(append_message))
        .route("/api/messages/{chat_id}/{message_id}", patch(update_message))
        .route("/api/posts", post(create_post))
        .route("/api/posts/{id}", patch(update_post).delete(delete_post));

    if let Some(dir) = &state.config.static_dir {
        info!(dir = %dir.display(), "Serving static frontend");
        router = router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        );
    }

    router
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

async fn initial_data(State(state): State<AppState>) -> Result<Json<Map<String, Value>>, ServerError> {
    let snapshot = state.with_db(|db| db.snapshot())?;
    Ok(Json(snapshot))
}

// ─── Users ───

async fn register(
    State(state): State<AppState>,
    payload: Body<UserEnvelope>,
) -> Result<Json<Ack>, ServerError> {
    let Json(body) = payload?;
    let collection = Collection::for_role(body.role);
    state.with_db(|db| db.insert_document(collection, &body.user))?;

    info!(role = %body.role, "User registered");
    Ok(Json(Ack::OK))
}

async fn update_user(
    State(state): State<AppState>,
    payload: Body<UserEnvelope>,
) -> Result<Json<Ack>, ServerError> {
    let Json(body) = payload?;
    let id = body
        .user
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| ServerError::BadBody("user has no id".into()))?
        .to_string();
    let fields = into_object(body.user)?;

    let matched = state.with_db(|db| db.set_fields(Collection::for_role(body.role), &id, &fields))?;
    log_unmatched(matched, Collection::for_role(body.role), &id);
    Ok(Json(Ack::OK))
}

async fn delete_user(
    State(state): State<AppState>,
    payload: Body<DeleteUserBody>,
) -> Result<Json<Ack>, ServerError> {
    let Json(body) = payload?;
    let collection = Collection::for_role(body.role);
    let deleted = state.with_db(|db| db.delete_document(collection, &body.id))?;

    info!(id = %body.id, role = %body.role, deleted, "User deleted");
    Ok(Json(Ack::OK))
}

// ─── Requests, cases, chats ───

async fn create_request(State(state): State<AppState>, payload: Body<Value>) -> Result<Json<Ack>, ServerError> {
    insert(&state, Collection::Requests, payload)
}

async fn update_request_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Body<StatusBody>,
) -> Result<Json<Ack>, ServerError> {
    let Json(body) = payload?;
    let mut fields = Map::new();
    fields.insert("status".into(), serde_json::to_value(body.status)?);

    let matched = state.with_db(|db| db.set_fields(Collection::Requests, &id, &fields))?;
    log_unmatched(matched, Collection::Requests, &id);
    Ok(Json(Ack::OK))
}

async fn create_case(State(state): State<AppState>, payload: Body<Value>) -> Result<Json<Ack>, ServerError> {
    insert(&state, Collection::Cases, payload)
}

async fn update_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Body<Value>,
) -> Result<Json<Ack>, ServerError> {
    set(&state, Collection::Cases, &id, payload)
}

async fn create_chat(State(state): State<AppState>, payload: Body<Value>) -> Result<Json<Ack>, ServerError> {
    insert(&state, Collection::Chats, payload)
}

async fn append_message(
    State(state): State<AppState>,
    payload: Body<AppendMessageBody>,
) -> Result<Json<Ack>, ServerError> {
    let Json(body) = payload?;
    let message = serde_json::to_value(&body.message)?;

    let matched = state.with_db(|db| {
        db.push_to_array(Collection::Chats, &body.chat_id, "messages", message)
    })?;
    log_unmatched(matched, Collection::Chats, &body.chat_id);
    Ok(Json(Ack::OK))
}

async fn update_message(
    State(state): State<AppState>,
    Path((chat_id, message_id)): Path<(String, String)>,
    payload: Body<MessagePatch>,
) -> Result<Json<Ack>, ServerError> {
    let Json(patch) = payload?;
    let fields = into_object(serde_json::to_value(&patch)?)?;

    let matched = state.with_db(|db| {
        db.update_array_element(Collection::Chats, &chat_id, "messages", &message_id, &fields)
    })?;
    if !matched {
        debug!(chat_id = %chat_id, message_id = %message_id, "No message matched update");
    }
    Ok(Json(Ack::OK))
}

// ─── LawyerUp posts ───

async fn create_post(State(state): State<AppState>, payload: Body<Value>) -> Result<Json<Ack>, ServerError> {
    insert(&state, Collection::Posts, payload)
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Body<Value>,
) -> Result<Json<Ack>, ServerError> {
    set(&state, Collection::Posts, &id, payload)
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ServerError> {
    let deleted = state.with_db(|db| db.delete_document(Collection::Posts, &id))?;
    debug!(id = %id, deleted, "Post delete");
    Ok(Json(Ack::OK))
}

// ─── Helpers ───

fn insert(state: &AppState, collection: Collection, payload: Body<Value>) -> Result<Json<Ack>, ServerError> {
    let Json(doc) = payload?;
    state.with_db(|db| db.insert_document(collection, &doc))?;
    Ok(Json(Ack::OK))
}

fn set(
    state: &AppState,
    collection: Collection,
    id: &str,
    payload: Body<Value>,
) -> Result<Json<Ack>, ServerError> {
    let Json(value) = payload?;
    let fields = into_object(value)?;
    let matched = state.with_db(|db| db.set_fields(collection, id, &fields))?;
    log_unmatched(matched, collection, id);
    Ok(Json(Ack::OK))
}

fn into_object(value: Value) -> Result<Map<String, Value>, ServerError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ServerError::BadBody("expected a JSON object".into())),
    }
}

/// Updates of unknown ids succeed without effect.
fn log_unmatched(matched: bool, collection: Collection, id: &str) {
    if !matched {
        debug!(collection = %collection, id = %id, "No document matched update");
    }
}

pub async fn serve(
    state: AppState,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
