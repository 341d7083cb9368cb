//! Working material attached to a case: notes, evidence and drafts.
//!
//! Every command sends the complete updated array to the gateway, never a
//! single element.

use chrono::{Local, Utc};
use tracing::debug;

use lawpoint_shared::constants::DRAFT_ID_PREFIX;
use lawpoint_shared::models::{Case, DraftFile};
use lawpoint_shared::patch::CasePatch;
use lawpoint_shared::types::new_id;

use crate::error::{ClientError, Result};
use crate::mirror::MirrorCommand;
use crate::state::Marketplace;

/// Prefix of investigation notes, e.g. `10/16/2026, 3:04:05 PM`.
const NOTE_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

impl Marketplace {
    /// Prepend `note` to the case's notes, stamped with the local time.
    pub fn add_note(&mut self, case_id: &str, note: &str) -> Result<()> {
        let stamped = format!("{}: {note}", Local::now().format(NOTE_TIME_FORMAT));
        self.edit_case(case_id, |case| {
            case.notes.insert(0, stamped);
            CasePatch {
                notes: Some(case.notes.clone()),
                ..Default::default()
            }
        })
    }

    pub fn add_file(&mut self, case_id: &str, file_url: &str) -> Result<()> {
        self.edit_case(case_id, |case| {
            case.files.push(file_url.to_string());
            CasePatch {
                files: Some(case.files.clone()),
                ..Default::default()
            }
        })
    }

    pub fn add_image(&mut self, case_id: &str, image_url: &str) -> Result<()> {
        self.edit_case(case_id, |case| {
            case.images.push(image_url.to_string());
            CasePatch {
                images: Some(case.images.clone()),
                ..Default::default()
            }
        })
    }

    /// Start an empty draft. Returns the draft id.
    pub fn create_draft(&mut self, case_id: &str, title: &str) -> Result<String> {
        let draft = DraftFile {
            id: new_id(DRAFT_ID_PREFIX),
            title: title.to_string(),
            content: String::new(),
            last_modified: Utc::now(),
        };
        let id = draft.id.clone();
        self.edit_case(case_id, |case| {
            case.drafts.push(draft);
            drafts_patch(case)
        })?;
        Ok(id)
    }

    /// Replace a draft's content and bump its modification time.
    pub fn update_draft(&mut self, case_id: &str, draft_id: &str, content: &str) -> Result<()> {
        let exists = self
            .case(case_id)
            .ok_or_else(|| ClientError::unknown("case", case_id))?
            .drafts
            .iter()
            .any(|d| d.id == draft_id);
        if !exists {
            return Err(ClientError::unknown("draft", draft_id));
        }

        self.edit_case(case_id, |case| {
            if let Some(draft) = case.drafts.iter_mut().find(|d| d.id == draft_id) {
                draft.content = content.to_string();
                draft.last_modified = Utc::now();
            }
            drafts_patch(case)
        })
    }

    pub fn delete_draft(&mut self, case_id: &str, draft_id: &str) -> Result<()> {
        self.edit_case(case_id, |case| {
            case.drafts.retain(|d| d.id != draft_id);
            drafts_patch(case)
        })
    }

    /// Apply `edit` to the case and mirror the patch it returns.
    fn edit_case(&mut self, case_id: &str, edit: impl FnOnce(&mut Case) -> CasePatch) -> Result<()> {
        let patch = edit(self.case_mut(case_id)?);
        debug!(case_id, patch = ?patch, "Case material updated");
        self.mirror(MirrorCommand::UpdateCase {
            id: case_id.to_string(),
            patch,
        });
        Ok(())
    }
}

fn drafts_patch(case: &Case) -> CasePatch {
    CasePatch {
        drafts: Some(case.drafts.clone()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::*;

    fn with_case() -> (Marketplace, crate::mirror::MirrorReceiver, String) {
        let (mut market, mut rx) = market();
        sign_in_as_lawyer(&mut market);
        let case_id = market.create_new_case("Tenancy dispute", "c1").unwrap();
        drain(&mut rx);
        (market, rx, case_id)
    }

    fn mirrored_patch(rx: &mut crate::mirror::MirrorReceiver) -> CasePatch {
        match drain(rx).pop() {
            Some(MirrorCommand::UpdateCase { patch, .. }) => patch,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_notes_are_newest_first_and_stamped() {
        let (mut market, mut rx, case_id) = with_case();
        market.add_note(&case_id, "Called the landlord").unwrap();
        market.add_note(&case_id, "Received lease copy").unwrap();

        let notes = &market.case(&case_id).unwrap().notes;
        assert_eq!(notes.len(), 2);
        assert!(notes[0].ends_with(": Received lease copy"));
        assert!(notes[1].ends_with(": Called the landlord"));
        assert!(notes[0].contains(", "));

        let patch = mirrored_patch(&mut rx);
        assert_eq!(patch.notes.as_ref(), Some(notes));
        assert!(patch.drafts.is_none());
    }

    #[test]
    fn test_files_and_images_append() {
        let (mut market, mut rx, case_id) = with_case();
        market.add_file(&case_id, "https://files.example/lease.pdf").unwrap();
        market.add_file(&case_id, "https://files.example/notice.pdf").unwrap();
        market.add_image(&case_id, "https://files.example/door.jpg").unwrap();

        let case = market.case(&case_id).unwrap();
        assert_eq!(case.files[1], "https://files.example/notice.pdf");
        assert_eq!(case.images, vec!["https://files.example/door.jpg".to_string()]);

        let patch = mirrored_patch(&mut rx);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({ "images": ["https://files.example/door.jpg"] })
        );
    }

    #[test]
    fn test_draft_lifecycle() {
        let (mut market, mut rx, case_id) = with_case();
        let draft_id = market.create_draft(&case_id, "Legal notice").unwrap();
        let created = market.case(&case_id).unwrap().drafts[0].clone();
        assert_eq!(created.content, "");
        assert_eq!(created.title, "Legal notice");

        market
            .update_draft(&case_id, &draft_id, "To whom it may concern")
            .unwrap();
        let updated = &market.case(&case_id).unwrap().drafts[0];
        assert_eq!(updated.content, "To whom it may concern");
        assert!(updated.last_modified >= created.last_modified);
        assert_eq!(mirrored_patch(&mut rx).drafts.unwrap()[0].content, "To whom it may concern");

        market.delete_draft(&case_id, &draft_id).unwrap();
        assert!(market.case(&case_id).unwrap().drafts.is_empty());
        assert_eq!(mirrored_patch(&mut rx).drafts, Some(Vec::new()));
    }

    #[test]
    fn test_unknown_targets() {
        let (mut market, mut rx, case_id) = with_case();
        assert!(matches!(
            market.add_note("case-missing", "x"),
            Err(ClientError::UnknownEntity { kind: "case", .. })
        ));
        assert!(matches!(
            market.update_draft(&case_id, "draft-missing", "x"),
            Err(ClientError::UnknownEntity { kind: "draft", .. })
        ));
        assert!(drain(&mut rx).is_empty());
    }
}
