//! Case status transitions and manual case creation.
//!
//! Two transitions adjust the assigned lawyer's stored counters:
//!
//! - **closing**: into `completed` from any other status. `casesHandled`
//!   goes up by one, plus `casesWon`, `casesLost` or `casesSettled` for a
//!   `win`, `loss` or `settled` result.
//! - **reopening**: into `active` from `completed`, `closed`, `dropped` or
//!   `inactive`. `result` and `closingNote` are cleared locally and unset
//!   remotely. The counters go down by one according to the result the case
//!   held, never below zero.
//!
//! A case carries `countedInStats` while its closing is reflected in the
//! counters. Closing a counted case adds nothing and reopening an uncounted
//! one takes nothing away, so pausing an active case (`inactive`) and
//! resuming it leaves the lawyer's record alone.

use tracing::{info, warn};

use lawpoint_shared::api::UserEnvelope;
use lawpoint_shared::constants::{CASE_ID_PREFIX, MANUAL_CASE_DESCRIPTION};
use lawpoint_shared::models::{Account, Case, Lawyer};
use lawpoint_shared::patch::CasePatch;
use lawpoint_shared::types::{new_id, CaseResult, CaseStatus, CaseUrgency, UserRole};

use crate::error::Result;
use crate::mirror::MirrorCommand;
use crate::state::Marketplace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Closing,
    Reopening,
    Plain,
}

fn classify(old: CaseStatus, new: CaseStatus) -> Transition {
    if new == CaseStatus::Completed && old != CaseStatus::Completed {
        Transition::Closing
    } else if new == CaseStatus::Active && old.is_reopenable() {
        Transition::Reopening
    } else {
        Transition::Plain
    }
}

fn result_counter(lawyer: &mut Lawyer, result: Option<CaseResult>) -> Option<&mut u32> {
    match result? {
        CaseResult::Win => Some(&mut lawyer.cases_won),
        CaseResult::Loss => Some(&mut lawyer.cases_lost),
        CaseResult::Settled => Some(&mut lawyer.cases_settled),
        CaseResult::Draw | CaseResult::Other => None,
    }
}

impl Marketplace {
    /// Move a case to `status`. `result` and `closing_note` are recorded
    /// when given; on reopening they are cleared regardless.
    pub fn update_case_status(
        &mut self,
        case_id: &str,
        status: CaseStatus,
        result: Option<CaseResult>,
        closing_note: Option<String>,
    ) -> Result<()> {
        let acting_lawyer = match &self.session {
            Some(Account::Lawyer(l)) => Some(l.user.id.clone()),
            _ => None,
        };

        let case = self.case_mut(case_id)?;
        let old_status = case.status;
        let old_result = case.result;
        let was_counted = case.counted_in_stats;
        let counter_owner = case.lawyer_id.clone().or(acting_lawyer);
        let transition = classify(old_status, status);

        let mut patch = match transition {
            Transition::Reopening => CasePatch {
                status: Some(status),
                result: Some(None),
                closing_note: Some(None),
                ..Default::default()
            },
            Transition::Closing | Transition::Plain => CasePatch {
                status: Some(status),
                result: result.map(Some),
                closing_note: closing_note.map(Some),
                ..Default::default()
            },
        };

        let moves_counters = match transition {
            Transition::Closing => !was_counted,
            Transition::Reopening => was_counted,
            Transition::Plain => false,
        };
        let mut lawyer = None;
        if let Some(lawyer_id) = counter_owner.filter(|_| moves_counters) {
            lawyer = self.find_lawyer(&lawyer_id);
            if lawyer.is_none() {
                warn!(case_id, lawyer_id = %lawyer_id, "Assigned lawyer unknown, counters unchanged");
            }
        }

        if let Some(lawyer) = lawyer.as_mut() {
            if transition == Transition::Closing {
                lawyer.cases_handled += 1;
                if let Some(counter) = result_counter(lawyer, result) {
                    *counter += 1;
                }
                patch.counted_in_stats = Some(true);
            } else {
                lawyer.cases_handled = lawyer.cases_handled.saturating_sub(1);
                if let Some(counter) = result_counter(lawyer, old_result) {
                    *counter = counter.saturating_sub(1);
                }
                patch.counted_in_stats = Some(false);
            }
        }

        patch.apply_to(self.case_mut(case_id)?);
        info!(
            case_id,
            from = %old_status,
            to = %status,
            ?transition,
            counted = lawyer.is_some(),
            "Case status changed"
        );
        self.mirror(MirrorCommand::UpdateCase {
            id: case_id.to_string(),
            patch,
        });

        if let Some(lawyer) = lawyer {
            let envelope = UserEnvelope {
                user: serde_json::to_value(&lawyer)?,
                role: UserRole::Lawyer,
            };
            self.store_lawyer(lawyer);
            self.mirror(MirrorCommand::UpdateUser(envelope));
        }
        Ok(())
    }

    /// Open an `active` case for `client_id` owned by the signed-in lawyer,
    /// bypassing the request flow. Returns the case id.
    pub fn create_new_case(&mut self, title: &str, client_id: &str) -> Result<String> {
        let lawyer_id = self.signed_in_lawyer()?.user.id.clone();

        let case = Case {
            id: new_id(CASE_ID_PREFIX),
            client_id: client_id.to_string(),
            lawyer_id: Some(lawyer_id.clone()),
            case_type: title.to_string(),
            description: MANUAL_CASE_DESCRIPTION.to_string(),
            urgency: CaseUrgency::None,
            status: CaseStatus::Active,
            result: None,
            closing_note: None,
            notes: Vec::new(),
            files: Vec::new(),
            images: Vec::new(),
            drafts: Vec::new(),
            review_submitted: false,
            counted_in_stats: false,
        };
        let id = case.id.clone();
        info!(case_id = %id, client_id, "Case created manually");

        self.cases.push(case.clone());
        self.mirror(MirrorCommand::CreateCase(case));
        self.notify(&lawyer_id, format!("Created case \"{title}\"."));
        Ok(id)
    }
}
