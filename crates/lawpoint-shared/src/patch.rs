//! Partial-update records.
//!
//! A patch lists exactly the fields an operation changes. Outer `None` means
//! "leave alone" and is omitted on the wire. For clearable fields the inner
//! `None` serializes as `null`, which the store treats as an explicit unset.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{Case, ChatMessage, Comment, DraftFile, LawyerUpPost};
use crate::types::{CaseResult, CaseStatus};

/// Distinguish a missing field from an explicit `null` when deserializing.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub result: Option<Option<CaseResult>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub closing_note: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drafts: Option<Vec<DraftFile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_submitted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counted_in_stats: Option<bool>,
}

impl CasePatch {
    pub fn apply_to(&self, case: &mut Case) {
        if let Some(status) = self.status {
            case.status = status;
        }
        if let Some(result) = self.result {
            case.result = result;
        }
        if let Some(note) = &self.closing_note {
            case.closing_note = note.clone();
        }
        if let Some(notes) = &self.notes {
            case.notes = notes.clone();
        }
        if let Some(files) = &self.files {
            case.files = files.clone();
        }
        if let Some(images) = &self.images {
            case.images = images.clone();
        }
        if let Some(drafts) = &self.drafts {
            case.drafts = drafts.clone();
        }
        if let Some(flag) = self.review_submitted {
            case.review_submitted = flag;
        }
        if let Some(flag) = self.counted_in_stats {
            case.counted_in_stats = flag;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub image_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

impl PostPatch {
    pub fn apply_to(&self, post: &mut LawyerUpPost) {
        if let Some(text) = &self.text {
            post.text = text.clone();
        }
        if let Some(url) = &self.image_url {
            post.image_url = url.clone();
        }
        if let Some(likes) = &self.likes {
            post.likes = likes.clone();
        }
        if let Some(comments) = &self.comments {
            post.comments = comments.clone();
        }
    }
}

/// Soft-delete markers for a single chat message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_for_everyone: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_for: Option<Vec<String>>,
}

impl MessagePatch {
    pub fn apply_to(&self, message: &mut ChatMessage) {
        if let Some(flag) = self.deleted_for_everyone {
            message.deleted_for_everyone = flag;
        }
        if let Some(ids) = &self.deleted_for {
            message.deleted_for = ids.clone();
        }
    }
}
