//! The marketplace store object.
//!
//! [`Marketplace`] is owned by the embedding process and mutated only
//! through its command methods (see [`crate::commands`]). Every command
//! commits locally first and then queues its gateway call.

use std::sync::Arc;

use tracing::{info, warn};

use lawpoint_shared::api::InitialData;
use lawpoint_shared::models::{
    Account, Case, Chat, Client, ClientRequest, Lawyer, LawyerUpPost, Notification,
};
use lawpoint_shared::types::UserRole;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::gateway::{Gateway, HttpGateway};
use crate::mirror::{spawn_mirror, MirrorCommand, MirrorSender};
use crate::session::SessionStore;

/// Central marketplace state.
#[derive(Debug, Default)]
pub struct Marketplace {
    pub(crate) clients: Vec<Client>,
    pub(crate) lawyers: Vec<Lawyer>,
    pub(crate) cases: Vec<Case>,
    pub(crate) chats: Vec<Chat>,
    /// Newest first.
    pub(crate) requests: Vec<ClientRequest>,
    /// Newest first.
    pub(crate) posts: Vec<LawyerUpPost>,
    /// Newest first. Never sent to the gateway.
    pub(crate) notifications: Vec<Notification>,

    /// Signed-in user, `None` when logged out.
    pub(crate) session: Option<Account>,

    /// Queue of the mirror worker. `None` runs local-only.
    mirror: Option<MirrorSender>,

    session_store: Option<SessionStore>,
}

impl Marketplace {
    /// An empty, local-only marketplace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue every future change on `mirror`.
    pub fn with_mirror(mut self, mirror: MirrorSender) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Cache the signed-in user in `store`.
    pub fn with_session_store(mut self, store: SessionStore) -> Self {
        self.session_store = Some(store);
        self
    }

    /// Build a marketplace backed by the gateway at `config.api_url`.
    ///
    /// Loads the initial data (an unreachable gateway leaves the store empty
    /// and logs a warning), starts the mirror worker and restores a cached
    /// session. Must be called inside a Tokio runtime.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let gateway = Arc::new(HttpGateway::new(&config.api_url, config.http_timeout)?);

        let mut market = Self::new();
        match gateway.fetch_initial_data().await {
            Ok(data) => market.hydrate(data),
            Err(e) => warn!(
                url = %config.api_url,
                error = %e,
                "Gateway unreachable, running in local-only mode"
            ),
        }

        let (mirror, _worker) = spawn_mirror(gateway);
        market.mirror = Some(mirror);

        if let Some(path) = &config.session_path {
            market.session_store = Some(SessionStore::new(path.clone()));
            market.resume_session();
        }

        Ok(market)
    }

    /// Replace each local collection with the fetched one, but only when the
    /// fetched collection is non-empty.
    pub fn hydrate(&mut self, data: InitialData) {
        fn replace<T>(local: &mut Vec<T>, fetched: Vec<T>) {
            if !fetched.is_empty() {
                *local = fetched;
            }
        }

        info!(
            clients = data.clients.len(),
            lawyers = data.lawyers.len(),
            cases = data.cases.len(),
            chats = data.chats.len(),
            requests = data.requests.len(),
            posts = data.posts.len(),
            "Hydrating marketplace"
        );

        replace(&mut self.clients, data.clients);
        replace(&mut self.lawyers, data.lawyers);
        replace(&mut self.cases, data.cases);
        replace(&mut self.chats, data.chats);
        replace(&mut self.requests, data.requests);
        replace(&mut self.posts, data.posts);
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn lawyers(&self) -> &[Lawyer] {
        &self.lawyers
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn requests(&self) -> &[ClientRequest] {
        &self.requests
    }

    pub fn posts(&self) -> &[LawyerUpPost] {
        &self.posts
    }

    pub fn current_user(&self) -> Option<&Account> {
        self.session.as_ref()
    }

    pub fn current_role(&self) -> Option<UserRole> {
        self.session.as_ref().map(Account::role)
    }

    pub fn case(&self, id: &str) -> Option<&Case> {
        self.cases.iter().find(|c| c.id == id)
    }

    pub fn chat(&self, id: &str) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id == id)
    }

    pub fn request(&self, id: &str) -> Option<&ClientRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    pub fn lawyer(&self, id: &str) -> Option<&Lawyer> {
        self.lawyers.iter().find(|l| l.user.id == id)
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.user.id == id)
    }

    pub fn post(&self, id: &str) -> Option<&LawyerUpPost> {
        self.posts.iter().find(|p| p.id == id)
    }

    // ------------------------------------------------------------------
    // Internal helpers for commands
    // ------------------------------------------------------------------

    /// Queue a gateway call. Local-only stores drop it.
    pub(crate) fn mirror(&self, command: MirrorCommand) {
        if let Some(tx) = &self.mirror {
            if let Err(e) = tx.send(command) {
                warn!(command = e.0.name(), "Mirror worker gone, change kept locally");
            }
        }
    }

    pub(crate) fn signed_in(&self) -> Result<&Account> {
        self.session.as_ref().ok_or(ClientError::NotSignedIn)
    }

    pub(crate) fn signed_in_lawyer(&self) -> Result<&Lawyer> {
        match self.signed_in()? {
            Account::Lawyer(lawyer) => Ok(lawyer),
            Account::Client(_) => Err(ClientError::WrongRole {
                expected: UserRole::Lawyer,
            }),
        }
    }

    pub(crate) fn case_mut(&mut self, id: &str) -> Result<&mut Case> {
        self.cases
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ClientError::unknown("case", id))
    }

    pub(crate) fn chat_mut(&mut self, id: &str) -> Result<&mut Chat> {
        self.chats
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ClientError::unknown("chat", id))
    }

    pub(crate) fn post_mut(&mut self, id: &str) -> Result<&mut LawyerUpPost> {
        self.posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ClientError::unknown("post", id))
    }

    /// Lawyer record by id, falling back to the signed-in lawyer when the
    /// list does not hold it.
    pub(crate) fn find_lawyer(&self, id: &str) -> Option<Lawyer> {
        self.lawyer(id).cloned().or_else(|| match &self.session {
            Some(Account::Lawyer(l)) if l.user.id == id => Some(l.clone()),
            _ => None,
        })
    }

    /// Client record by id, falling back to the signed-in client.
    pub(crate) fn find_client(&self, id: &str) -> Option<Client> {
        self.client(id).cloned().or_else(|| match &self.session {
            Some(Account::Client(c)) if c.user.id == id => Some(c.clone()),
            _ => None,
        })
    }

    /// Write `lawyer` back to the list and, when it is the signed-in user, to
    /// the session.
    pub(crate) fn store_lawyer(&mut self, lawyer: Lawyer) {
        if let Some(slot) = self.lawyers.iter_mut().find(|l| l.user.id == lawyer.user.id) {
            *slot = lawyer.clone();
        }
        if matches!(&self.session, Some(Account::Lawyer(l)) if l.user.id == lawyer.user.id) {
            self.set_session(Some(Account::Lawyer(lawyer)));
        }
    }

    /// Replace the session and update the on-disk cache. Cache failures are
    /// logged only.
    pub(crate) fn set_session(&mut self, account: Option<Account>) {
        if let Some(store) = &self.session_store {
            let outcome = match &account {
                Some(account) => store.save(account),
                None => store.clear(),
            };
            if let Err(e) = outcome {
                warn!(path = %store.path().display(), error = %e, "Failed to update session cache");
            }
        }
        self.session = account;
    }

    pub(crate) fn session_store(&self) -> Option<&SessionStore> {
        self.session_store.as_ref()
    }
}
