//! On-disk cache of the signed-in user, restored on the next start.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use lawpoint_shared::models::Account;
use lawpoint_shared::types::UserRole;

use crate::error::Result;

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    #[serde(rename = "lp_currentUser")]
    current_user: Value,
    #[serde(rename = "lp_userRole")]
    user_role: UserRole,
}

/// JSON file holding the current user record and its role.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, account: &Account) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = SessionFile {
            current_user: account.to_value()?,
            user_role: account.role(),
        };
        std::fs::write(&self.path, serde_json::to_vec_pretty(&file)?)?;
        Ok(())
    }

    /// `Ok(None)` when nothing is cached.
    pub fn load(&self) -> Result<Option<Account>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: SessionFile = serde_json::from_slice(&bytes)?;
        Ok(Some(Account::from_value(file.user_role, file.current_user)?))
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
