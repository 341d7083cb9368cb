//! Registration, sign-in and profile management.

use tracing::{info, warn};

use lawpoint_shared::api::{DeleteUserBody, UserEnvelope};
use lawpoint_shared::models::Account;
use lawpoint_shared::types::UserRole;

use crate::error::{ClientError, Result};
use crate::mirror::MirrorCommand;
use crate::state::Marketplace;

impl Marketplace {
    /// Add a new user to its role's list and sign them in.
    pub fn register(&mut self, account: Account) -> Result<()> {
        let envelope = UserEnvelope {
            user: account.to_value()?,
            role: account.role(),
        };
        info!(user_id = account.id(), role = %account.role(), "User registered");

        match &account {
            Account::Client(c) => self.clients.push(c.clone()),
            Account::Lawyer(l) => self.lawyers.push(l.clone()),
        }
        self.set_session(Some(account));
        self.mirror(MirrorCommand::Register(envelope));
        Ok(())
    }

    pub fn login(&mut self, account: Account) {
        info!(user_id = account.id(), role = %account.role(), "Signed in");
        self.set_session(Some(account));
    }

    pub fn logout(&mut self) {
        if let Some(account) = &self.session {
            info!(user_id = account.id(), "Signed out");
        }
        self.set_session(None);
    }

    /// Restore the cached session, if any. Returns whether a user is now
    /// signed in. An unreadable cache is logged and ignored.
    pub fn resume_session(&mut self) -> bool {
        let Some(store) = self.session_store().cloned() else {
            return false;
        };
        match store.load() {
            Ok(Some(account)) => {
                info!(user_id = account.id(), role = %account.role(), "Session restored");
                self.session = Some(account);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(path = %store.path().display(), error = %e, "Ignoring unreadable session cache");
                false
            }
        }
    }

    /// Replace the signed-in user's record with `updated`. The id and role
    /// must match the current session.
    pub fn update_profile(&mut self, updated: Account) -> Result<()> {
        let current = self.signed_in()?;
        if current.role() != updated.role() {
            return Err(ClientError::WrongRole {
                expected: current.role(),
            });
        }
        if current.id() != updated.id() {
            return Err(ClientError::unknown("user", updated.id()));
        }

        let envelope = UserEnvelope {
            user: updated.to_value()?,
            role: updated.role(),
        };
        match &updated {
            Account::Client(c) => {
                if let Some(slot) = self.clients.iter_mut().find(|x| x.user.id == c.user.id) {
                    *slot = c.clone();
                }
            }
            Account::Lawyer(l) => {
                if let Some(slot) = self.lawyers.iter_mut().find(|x| x.user.id == l.user.id) {
                    *slot = l.clone();
                }
            }
        }
        info!(user_id = updated.id(), "Profile updated");

        self.set_session(Some(updated));
        self.mirror(MirrorCommand::UpdateUser(envelope));
        Ok(())
    }

    /// Remove the signed-in user's record everywhere and sign out.
    pub fn delete_account(&mut self) -> Result<()> {
        let account = self.signed_in()?;
        let body = DeleteUserBody {
            id: account.id().to_string(),
            role: account.role(),
        };

        match body.role {
            UserRole::Client => self.clients.retain(|c| c.user.id != body.id),
            UserRole::Lawyer => self.lawyers.retain(|l| l.user.id != body.id),
        }
        info!(user_id = %body.id, role = %body.role, "Account deleted");

        self.mirror(MirrorCommand::DeleteUser(body));
        self.logout();
        Ok(())
    }
}
