use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a record id of the form `<prefix>-<uuid>`.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Lawyer,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Lawyer => "lawyer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CaseStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a case. No status is terminal: `completed`, `closed`
/// and `dropped` cases can always be reopened to `active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStatus {
    Pending,
    Active,
    Inactive,
    OnHold,
    Completed,
    Dropped,
    Closed,
}

impl CaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::OnHold => "on-hold",
            Self::Completed => "completed",
            Self::Dropped => "dropped",
            Self::Closed => "closed",
        }
    }

    /// Statuses from which a move back to `active` counts as a reopening.
    pub fn is_reopenable(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Closed | Self::Dropped | Self::Inactive
        )
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CaseResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseResult {
    Win,
    Loss,
    Settled,
    Draw,
    Other,
}

impl CaseResult {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Settled => "settled",
            Self::Draw => "draw",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for CaseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CaseUrgency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseUrgency {
    Immediate,
    High,
    #[default]
    Moderate,
    Low,
    None,
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_status_wire_names() {
        let json = serde_json::to_string(&CaseStatus::OnHold).unwrap();
        assert_eq!(json, "\"on-hold\"");
        let parsed: CaseStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, CaseStatus::Completed);
    }

    #[test]
    fn test_reopenable_statuses() {
        assert!(CaseStatus::Completed.is_reopenable());
        assert!(CaseStatus::Closed.is_reopenable());
        assert!(CaseStatus::Dropped.is_reopenable());
        assert!(CaseStatus::Inactive.is_reopenable());
        assert!(!CaseStatus::OnHold.is_reopenable());
        assert!(!CaseStatus::Pending.is_reopenable());
        assert!(!CaseStatus::Active.is_reopenable());
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(serde_json::from_str::<UserRole>("\"none\"").is_err());
        let role: UserRole = serde_json::from_str("\"lawyer\"").unwrap();
        assert_eq!(role, UserRole::Lawyer);
    }

    #[test]
    fn test_new_id_has_prefix() {
        let id = new_id("req");
        assert!(id.starts_with("req-"));
        assert_ne!(id, new_id("req"));
    }
}
