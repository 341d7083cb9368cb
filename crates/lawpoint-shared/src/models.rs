//! Domain records mirrored between the client state and the document store.
//!
//! Every struct derives `Serialize` and `Deserialize` with camelCase field
//! names so documents written by the gateway read back unchanged.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{GENERAL_INQUIRY_CASE_TYPE, GENERAL_INQUIRY_DESCRIPTION};
use crate::error::LawpointError;
use crate::types::{CaseResult, CaseStatus, CaseUrgency, Gender, RequestStatus, UserRole};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Identity fields common to clients and lawyers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dob: String,
    pub citizen_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub profile_pic_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(flatten)]
    pub user: User,
    pub username: String,
    /// Case the client is drafting before sending it to a lawyer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_case: Option<CaseDraft>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// 1 to 5
    pub rating: u8,
    pub comment: String,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

/// A lawyer profile.
///
/// `cases_handled`, `cases_won`, `cases_lost` and `cases_settled` are stored
/// counters, not derived from the case list. They move only when a case is
/// closed or reopened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lawyer {
    #[serde(flatten)]
    pub user: User,
    pub bar_council_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub university: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grad_year: Option<u16>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub awards: Vec<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub domain_strengths: Vec<String>,
    #[serde(default)]
    pub specialization: Vec<String>,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub location: String,
    /// Average fee per case.
    #[serde(default)]
    pub avg_price: f64,
    #[serde(default)]
    pub cases_handled: u32,
    #[serde(default)]
    pub cases_won: u32,
    #[serde(default)]
    pub cases_lost: u32,
    #[serde(default)]
    pub cases_settled: u32,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Lawyer {
    /// Mean review rating, or 0 when there are no reviews.
    pub fn average_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let total: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        f64::from(total) / self.reviews.len() as f64
    }
}

/// A signed-in or registering user together with their role.
#[derive(Debug, Clone, PartialEq)]
pub enum Account {
    Client(Client),
    Lawyer(Lawyer),
}

impl Account {
    pub fn role(&self) -> UserRole {
        match self {
            Self::Client(_) => UserRole::Client,
            Self::Lawyer(_) => UserRole::Lawyer,
        }
    }

    pub fn user(&self) -> &User {
        match self {
            Self::Client(c) => &c.user,
            Self::Lawyer(l) => &l.user,
        }
    }

    pub fn id(&self) -> &str {
        &self.user().id
    }

    pub fn to_value(&self) -> Result<serde_json::Value, LawpointError> {
        let value = match self {
            Self::Client(c) => serde_json::to_value(c)?,
            Self::Lawyer(l) => serde_json::to_value(l)?,
        };
        Ok(value)
    }

    /// Decode a stored user document according to its role.
    pub fn from_value(role: UserRole, value: serde_json::Value) -> Result<Self, LawpointError> {
        let account = match role {
            UserRole::Client => Self::Client(serde_json::from_value(value)?),
            UserRole::Lawyer => Self::Lawyer(serde_json::from_value(value)?),
        };
        Ok(account)
    }
}

// ---------------------------------------------------------------------------
// Cases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftFile {
    pub id: String,
    pub title: String,
    pub content: String,
    pub last_modified: DateTime<Utc>,
}

/// The body of a case without its id and parties. Clients draft one of these
/// before sending a request; accepting the request turns it into a [`Case`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDraft {
    pub case_type: String,
    pub description: String,
    #[serde(default)]
    pub urgency: CaseUrgency,
    pub status: CaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CaseResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_note: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub drafts: Vec<DraftFile>,
    #[serde(default)]
    pub review_submitted: bool,
}

impl CaseDraft {
    pub fn new(case_type: impl Into<String>, description: impl Into<String>, urgency: CaseUrgency) -> Self {
        Self {
            case_type: case_type.into(),
            description: description.into(),
            urgency,
            status: CaseStatus::Pending,
            result: None,
            closing_note: None,
            notes: Vec::new(),
            files: Vec::new(),
            images: Vec::new(),
            drafts: Vec::new(),
            review_submitted: false,
        }
    }

    /// Draft sent when the client has not described a case yet.
    pub fn general_inquiry() -> Self {
        Self::new(
            GENERAL_INQUIRY_CASE_TYPE,
            GENERAL_INQUIRY_DESCRIPTION,
            CaseUrgency::Moderate,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: String,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lawyer_id: Option<String>,
    pub case_type: String,
    pub description: String,
    #[serde(default)]
    pub urgency: CaseUrgency,
    pub status: CaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CaseResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_note: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub drafts: Vec<DraftFile>,
    #[serde(default)]
    pub review_submitted: bool,
    /// Set while the case's closing is reflected in its lawyer's counters.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub counted_in_stats: bool,
}

impl Case {
    /// Open an active case from an accepted draft. Working lists and the
    /// review flag start empty regardless of what the draft carried.
    pub fn open_from_draft(
        id: String,
        client_id: String,
        lawyer_id: Option<String>,
        draft: &CaseDraft,
    ) -> Self {
        Self {
            id,
            client_id,
            lawyer_id,
            case_type: draft.case_type.clone(),
            description: draft.description.clone(),
            urgency: draft.urgency,
            status: CaseStatus::Active,
            result: draft.result,
            closing_note: draft.closing_note.clone(),
            notes: Vec::new(),
            files: Vec::new(),
            images: Vec::new(),
            drafts: Vec::new(),
            review_submitted: false,
            counted_in_stats: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Name card of a party embedded in requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub profile_pic_url: String,
}

impl From<&User> for PartyRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            profile_pic_url: user.profile_pic_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequest {
    pub id: String,
    pub client: PartyRef,
    pub lawyer: PartyRef,
    pub case_details: CaseDraft,
    pub status: RequestStatus,
}

// ---------------------------------------------------------------------------
// Chats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    #[serde(default)]
    pub profile_pic_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub participant_ids: Vec<String>,
    pub participants: BTreeMap<String, Participant>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl Chat {
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participant_ids.iter().any(|id| id == user_id)
    }

    pub fn message_mut(&mut self, message_id: &str) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|m| m.id == message_id)
    }
}

/// A chat message. Deletion is soft: the record always stays in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted_for_everyone: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted_for: Vec<String>,
}

impl ChatMessage {
    /// Whether `viewer_id` removed this message from their own view.
    pub fn is_hidden_for(&self, viewer_id: &str) -> bool {
        self.deleted_for.iter().any(|id| id == viewer_id)
    }
}

// ---------------------------------------------------------------------------
// LawyerUp feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commenter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub profile_pic_url: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub commenter: Commenter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LawyerUpPost {
    pub id: String,
    pub lawyer_id: String,
    #[serde(default)]
    pub lawyer_name: String,
    #[serde(default)]
    pub lawyer_profile_pic_url: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Ids of users who liked the post; each id appears at most once.
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}
