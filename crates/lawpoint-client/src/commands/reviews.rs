use chrono::Utc;
use tracing::info;

use lawpoint_shared::api::UserEnvelope;
use lawpoint_shared::models::Review;
use lawpoint_shared::patch::CasePatch;
use lawpoint_shared::types::UserRole;

use crate::error::{ClientError, Result};
use crate::mirror::MirrorCommand;
use crate::state::Marketplace;

impl Marketplace {
    /// Review `lawyer_id` for the work done on `case_id` as the signed-in
    /// user. A case takes one review only.
    pub fn add_review(&mut self, lawyer_id: &str, case_id: &str, rating: u8, comment: &str) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(ClientError::InvalidRating(rating));
        }
        let reviewer = self.signed_in()?.user().name.clone();

        let case = self
            .case(case_id)
            .ok_or_else(|| ClientError::unknown("case", case_id))?;
        if case.review_submitted {
            return Err(ClientError::ReviewAlreadySubmitted {
                case_id: case_id.to_string(),
            });
        }
        let mut lawyer = self
            .find_lawyer(lawyer_id)
            .ok_or_else(|| ClientError::unknown("lawyer", lawyer_id))?;

        lawyer.reviews.push(Review {
            rating,
            comment: comment.to_string(),
            client_name: reviewer.clone(),
            timestamp: Utc::now(),
        });
        let envelope = UserEnvelope {
            user: serde_json::to_value(&lawyer)?,
            role: UserRole::Lawyer,
        };
        self.store_lawyer(lawyer);
        self.mirror(MirrorCommand::UpdateUser(envelope));

        let patch = CasePatch {
            review_submitted: Some(true),
            ..Default::default()
        };
        patch.apply_to(self.case_mut(case_id)?);
        self.mirror(MirrorCommand::UpdateCase {
            id: case_id.to_string(),
            patch,
        });

        info!(lawyer_id, case_id, rating, "Review submitted");
        self.notify(lawyer_id, format!("New review from {reviewer}."));
        Ok(())
    }
}
