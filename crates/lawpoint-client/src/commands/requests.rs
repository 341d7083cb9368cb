use std::collections::BTreeMap;

use tracing::info;

use lawpoint_shared::constants::{CASE_ID_PREFIX, CHAT_ID_PREFIX, REQUEST_ID_PREFIX};
use lawpoint_shared::models::{Case, CaseDraft, Chat, ClientRequest, Participant, PartyRef};
use lawpoint_shared::types::{new_id, RequestStatus};

use crate::error::{ClientError, Result};
use crate::mirror::MirrorCommand;
use crate::state::Marketplace;

/// Ids created by accepting a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptance {
    pub case_id: String,
    pub chat_id: String,
}

impl Marketplace {
    /// Send a `pending` request from `client_id` to `lawyer_id`, carrying the
    /// client's drafted case or a general inquiry. Returns the request id.
    pub fn send_request(&mut self, lawyer_id: &str, client_id: &str) -> Result<String> {
        let lawyer = self
            .find_lawyer(lawyer_id)
            .ok_or_else(|| ClientError::unknown("lawyer", lawyer_id))?;
        let client = self
            .find_client(client_id)
            .ok_or_else(|| ClientError::unknown("client", client_id))?;

        let request = ClientRequest {
            id: new_id(REQUEST_ID_PREFIX),
            client: PartyRef::from(&client.user),
            lawyer: PartyRef::from(&lawyer.user),
            case_details: client
                .current_case
                .clone()
                .unwrap_or_else(CaseDraft::general_inquiry),
            status: RequestStatus::Pending,
        };
        let id = request.id.clone();

        info!(request_id = %id, client_id, lawyer_id, "Request sent");

        self.requests.insert(0, request.clone());
        self.notify(lawyer_id, format!("New request from {}.", client.user.name));
        self.mirror(MirrorCommand::CreateRequest(request));
        Ok(id)
    }

    /// Accept a pending request: opens an `active` case and a two-party chat
    /// whose id is derived from the request id.
    pub fn accept_request(&mut self, request_id: &str) -> Result<Acceptance> {
        let request = self.transition_request(request_id, RequestStatus::Accepted)?;

        let case = Case::open_from_draft(
            new_id(CASE_ID_PREFIX),
            request.client.id.clone(),
            Some(request.lawyer.id.clone()),
            &request.case_details,
        );

        let participants = [&request.client, &request.lawyer]
            .into_iter()
            .map(|party| {
                (
                    party.id.clone(),
                    Participant {
                        name: party.name.clone(),
                        profile_pic_url: party.profile_pic_url.clone(),
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();
        let chat = Chat {
            id: format!("{CHAT_ID_PREFIX}-{}", request.id),
            participant_ids: vec![request.client.id.clone(), request.lawyer.id.clone()],
            participants,
            messages: Vec::new(),
        };

        let acceptance = Acceptance {
            case_id: case.id.clone(),
            chat_id: chat.id.clone(),
        };
        info!(
            request_id,
            case_id = %acceptance.case_id,
            chat_id = %acceptance.chat_id,
            "Request accepted"
        );

        self.cases.push(case.clone());
        self.mirror(MirrorCommand::CreateCase(case));

        self.chats.push(chat.clone());
        self.mirror(MirrorCommand::CreateChat(chat));

        self.notify(
            &request.client.id,
            format!("Request accepted by {}.", request.lawyer.name),
        );
        Ok(acceptance)
    }

    pub fn reject_request(&mut self, request_id: &str) -> Result<()> {
        self.transition_request(request_id, RequestStatus::Rejected)?;
        Ok(())
    }

    pub fn cancel_request(&mut self, request_id: &str) -> Result<()> {
        self.transition_request(request_id, RequestStatus::Cancelled)?;
        Ok(())
    }

    /// Move a pending request to `status` and mirror it. Requests that have
    /// already left `pending` are refused unchanged.
    fn transition_request(&mut self, request_id: &str, status: RequestStatus) -> Result<ClientRequest> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| ClientError::unknown("request", request_id))?;

        if request.status.is_terminal() {
            return Err(ClientError::RequestNotPending {
                id: request_id.to_string(),
                status: request.status,
            });
        }

        request.status = status;
        let updated = request.clone();
        info!(request_id, status = %status, "Request status changed");

        self.mirror(MirrorCommand::UpdateRequestStatus {
            id: request_id.to_string(),
            status,
        });
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::*;
    use lawpoint_shared::types::{CaseStatus, CaseUrgency};

    #[test]
    fn test_send_request_defaults_to_general_inquiry() {
        let (mut market, mut rx) = market();
        let id = market.send_request("l1", "c1").unwrap();

        let request = market.request(&id).unwrap();
        assert!(id.starts_with("req-"));
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.case_details.case_type, "General Inquiry");
        assert_eq!(request.case_details.urgency, CaseUrgency::Moderate);
        assert_eq!(request.client.name, "John Doe");

        assert_eq!(market.notifications_for("l1")[0].message, "New request from John Doe.");
        assert!(matches!(
            drain(&mut rx).as_slice(),
            [MirrorCommand::CreateRequest(r)] if r.id == id
        ));
    }

    #[test]
    fn test_send_request_to_unknown_lawyer() {
        let (mut market, mut rx) = market();
        let err = market.send_request("nobody", "c1").unwrap_err();
        assert!(matches!(err, ClientError::UnknownEntity { kind: "lawyer", .. }));
        assert!(market.requests().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_john_asks_anjali_for_cyber_law_help() {
        let (mut market, mut rx) = market();
        market.clients[0].current_case = Some(CaseDraft::new(
            "Cyber Law",
            "My social media account was hacked.",
            CaseUrgency::High,
        ));

        let request_id = market.send_request("l1", "c1").unwrap();
        assert_eq!(market.request(&request_id).unwrap().status, RequestStatus::Pending);
        drain(&mut rx);

        let acceptance = market.accept_request(&request_id).unwrap();

        assert_eq!(market.request(&request_id).unwrap().status, RequestStatus::Accepted);

        assert_eq!(market.cases().len(), 1);
        let case = market.case(&acceptance.case_id).unwrap();
        assert_eq!(case.status, CaseStatus::Active);
        assert_eq!(case.client_id, "c1");
        assert_eq!(case.lawyer_id.as_deref(), Some("l1"));
        assert_eq!(case.case_type, "Cyber Law");
        assert!(!case.review_submitted);

        assert_eq!(market.chats().len(), 1);
        let chat = market.chat(&acceptance.chat_id).unwrap();
        assert_eq!(chat.id, format!("chat-{request_id}"));
        assert_eq!(chat.participant_ids, vec!["c1".to_string(), "l1".to_string()]);
        assert_eq!(chat.participants["l1"].name, "Anjali Sharma");
        assert!(chat.messages.is_empty());

        assert_eq!(
            market.notifications_for("c1")[0].message,
            "Request accepted by Anjali Sharma."
        );

        let commands = drain(&mut rx);
        assert_eq!(commands.len(), 3);
        assert!(matches!(
            &commands[0],
            MirrorCommand::UpdateRequestStatus { id, status: RequestStatus::Accepted } if *id == request_id
        ));
        assert!(matches!(&commands[1], MirrorCommand::CreateCase(c) if c.id == acceptance.case_id));
        assert!(matches!(&commands[2], MirrorCommand::CreateChat(c) if c.id == acceptance.chat_id));
    }

    #[test]
    fn test_terminal_requests_cannot_transition_again() {
        let (mut market, mut rx) = market();
        let id = market.send_request("l1", "c1").unwrap();
        market.accept_request(&id).unwrap();
        drain(&mut rx);

        let err = market.accept_request(&id).unwrap_err();
        assert!(matches!(
            err,
            ClientError::RequestNotPending { status: RequestStatus::Accepted, .. }
        ));
        assert!(market.cancel_request(&id).is_err());
        assert!(market.reject_request(&id).is_err());

        assert_eq!(market.cases().len(), 1);
        assert_eq!(market.chats().len(), 1);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_reject_and_cancel_create_nothing() {
        let (mut market, mut rx) = market();
        let first = market.send_request("l1", "c1").unwrap();
        let second = market.send_request("l1", "c1").unwrap();
        drain(&mut rx);

        market.reject_request(&first).unwrap();
        market.cancel_request(&second).unwrap();

        assert_eq!(market.request(&first).unwrap().status, RequestStatus::Rejected);
        assert_eq!(market.request(&second).unwrap().status, RequestStatus::Cancelled);
        assert!(market.cases().is_empty());
        assert!(market.chats().is_empty());
        assert_eq!(drain(&mut rx).len(), 2);
    }

    #[test]
    fn test_newest_request_first() {
        let (mut market, _rx) = market();
        let first = market.send_request("l1", "c1").unwrap();
        let second = market.send_request("l1", "c1").unwrap();
        assert_eq!(market.requests()[0].id, second);
        assert_eq!(market.requests()[1].id, first);
    }
}
