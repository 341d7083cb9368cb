use std::fmt;

use lawpoint_shared::types::UserRole;

/// The six named collections of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Clients,
    Lawyers,
    Cases,
    Chats,
    Requests,
    Posts,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Self::Clients,
        Self::Lawyers,
        Self::Cases,
        Self::Chats,
        Self::Requests,
        Self::Posts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Lawyers => "lawyers",
            Self::Cases => "cases",
            Self::Chats => "chats",
            Self::Requests => "requests",
            Self::Posts => "posts",
        }
    }

    /// Collection holding user records of the given role.
    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::Client => Self::Clients,
            UserRole::Lawyer => Self::Lawyers,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
