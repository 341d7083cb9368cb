//! Read-side views over the marketplace state.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lawpoint_shared::constants::DELETED_MESSAGE_PLACEHOLDER;
use lawpoint_shared::models::{Case, Chat, ChatMessage, ClientRequest, Lawyer};

use crate::state::Marketplace;

/// Lawyer-list orderings offered to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    Experience,
    Rating,
    Specialization,
    #[default]
    Recommended,
}

/// A ranked lawyer suggestion; rank 1 is the best match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub lawyer_id: String,
    pub rank: u32,
}

impl Marketplace {
    pub fn cases_for_client(&self, client_id: &str) -> Vec<&Case> {
        self.cases.iter().filter(|c| c.client_id == client_id).collect()
    }

    pub fn cases_for_lawyer(&self, lawyer_id: &str) -> Vec<&Case> {
        self.cases
            .iter()
            .filter(|c| c.lawyer_id.as_deref() == Some(lawyer_id))
            .collect()
    }

    pub fn chats_for_user(&self, user_id: &str) -> Vec<&Chat> {
        self.chats.iter().filter(|c| c.has_participant(user_id)).collect()
    }

    pub fn requests_for_client(&self, client_id: &str) -> Vec<&ClientRequest> {
        self.requests
            .iter()
            .filter(|r| r.client.id == client_id)
            .collect()
    }

    pub fn requests_for_lawyer(&self, lawyer_id: &str) -> Vec<&ClientRequest> {
        self.requests
            .iter()
            .filter(|r| r.lawyer.id == lawyer_id)
            .collect()
    }
}

/// Messages of `chat` as `viewer_id` sees them: messages the viewer deleted
/// for themselves are dropped, messages deleted for everyone keep their
/// place with the text replaced by a placeholder.
pub fn visible_messages(chat: &Chat, viewer_id: &str) -> Vec<ChatMessage> {
    chat.messages
        .iter()
        .filter(|m| !m.is_hidden_for(viewer_id))
        .map(|m| {
            let mut shown = m.clone();
            if shown.deleted_for_everyone {
                shown.text = DELETED_MESSAGE_PLACEHOLDER.to_string();
            }
            shown
        })
        .collect()
}

/// Order `lawyers` for display. The sort is stable.
pub fn sort_lawyers(lawyers: &mut [Lawyer], option: SortOption, recommendations: &[Recommendation]) {
    match option {
        SortOption::Experience => lawyers.sort_by(by_experience),
        SortOption::Rating => lawyers.sort_by(|a, b| {
            b.average_rating()
                .partial_cmp(&a.average_rating())
                .unwrap_or(Ordering::Equal)
        }),
        SortOption::Specialization => lawyers.sort_by_cached_key(|l| {
            l.specialization
                .first()
                .map(|s| s.to_lowercase())
                .unwrap_or_default()
        }),
        SortOption::Recommended => {
            let ranks: HashMap<&str, u32> = recommendations
                .iter()
                .map(|r| (r.lawyer_id.as_str(), r.rank))
                .collect();
            lawyers.sort_by(|a, b| {
                match (ranks.get(a.user.id.as_str()), ranks.get(b.user.id.as_str())) {
                    (Some(ra), Some(rb)) => ra.cmp(rb),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => by_experience(a, b),
                }
            });
        }
    }
}

fn by_experience(a: &Lawyer, b: &Lawyer) -> Ordering {
    b.experience_years.cmp(&a.experience_years)
}
