use chrono::Utc;
use tracing::debug;

use lawpoint_shared::api::AppendMessageBody;
use lawpoint_shared::constants::MESSAGE_ID_PREFIX;
use lawpoint_shared::models::ChatMessage;
use lawpoint_shared::patch::MessagePatch;
use lawpoint_shared::types::new_id;

use crate::error::{ClientError, Result};
use crate::mirror::MirrorCommand;
use crate::state::Marketplace;

impl Marketplace {
    /// Build a message from the signed-in user to the other participant of
    /// `chat_id`. Nothing is sent.
    pub fn compose_message(&self, chat_id: &str, text: &str) -> Result<ChatMessage> {
        let sender_id = self.signed_in()?.id().to_string();
        let chat = self
            .chat(chat_id)
            .ok_or_else(|| ClientError::unknown("chat", chat_id))?;
        let receiver_id = chat
            .participant_ids
            .iter()
            .find(|id| **id != sender_id)
            .cloned()
            .unwrap_or_else(|| sender_id.clone());

        Ok(ChatMessage {
            id: new_id(MESSAGE_ID_PREFIX),
            sender_id,
            receiver_id,
            text: text.to_string(),
            timestamp: Utc::now(),
            deleted_for_everyone: false,
            deleted_for: Vec::new(),
        })
    }

    /// Append `message` to the chat's log.
    pub fn send_message(&mut self, chat_id: &str, message: ChatMessage) -> Result<()> {
        let chat = self.chat_mut(chat_id)?;
        chat.messages.push(message.clone());
        debug!(chat_id, message_id = %message.id, "Message sent");

        self.mirror(MirrorCommand::AppendMessage(AppendMessageBody {
            chat_id: chat_id.to_string(),
            message,
        }));
        Ok(())
    }

    /// Soft-delete a message. With `for_everyone` the text is hidden from
    /// every viewer; otherwise only the signed-in user stops seeing it.
    pub fn delete_message(&mut self, chat_id: &str, message_id: &str, for_everyone: bool) -> Result<()> {
        let viewer_id = self.signed_in()?.id().to_string();

        let message = self
            .chat_mut(chat_id)?
            .message_mut(message_id)
            .ok_or_else(|| ClientError::unknown("message", message_id))?;

        let patch = if for_everyone {
            MessagePatch {
                deleted_for_everyone: Some(true),
                ..Default::default()
            }
        } else {
            let mut hidden_for = message.deleted_for.clone();
            if !hidden_for.contains(&viewer_id) {
                hidden_for.push(viewer_id);
            }
            MessagePatch {
                deleted_for: Some(hidden_for),
                ..Default::default()
            }
        };
        patch.apply_to(message);
        debug!(chat_id, message_id, for_everyone, "Message deleted");

        self.mirror(MirrorCommand::UpdateMessage {
            chat_id: chat_id.to_string(),
            message_id: message_id.to_string(),
            patch,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::*;
    use crate::views::visible_messages;
    use lawpoint_shared::constants::DELETED_MESSAGE_PLACEHOLDER;

    fn with_chat() -> (Marketplace, crate::mirror::MirrorReceiver, String) {
        let (mut market, mut rx) = market();
        let request = market.send_request("l1", "c1").unwrap();
        let chat_id = market.accept_request(&request).unwrap().chat_id;
        sign_in_as_client(&mut market);
        drain(&mut rx);
        (market, rx, chat_id)
    }

    #[test]
    fn test_send_appends_and_mirrors() {
        let (mut market, mut rx, chat_id) = with_chat();

        let message = market.compose_message(&chat_id, "Hello, I need help").unwrap();
        assert_eq!(message.sender_id, "c1");
        assert_eq!(message.receiver_id, "l1");
        market.send_message(&chat_id, message.clone()).unwrap();

        assert_eq!(market.chat(&chat_id).unwrap().messages, vec![message.clone()]);
        match drain(&mut rx).as_slice() {
            [MirrorCommand::AppendMessage(body)] => {
                assert_eq!(body.chat_id, chat_id);
                assert_eq!(body.message, message);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn test_send_to_unknown_chat() {
        let (mut market, mut rx, _) = with_chat();
        let message = market.compose_message(&market.chats()[0].id.clone(), "hi").unwrap();
        assert!(market.send_message("chat-missing", message).is_err());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_delete_for_everyone_hides_text_for_all() {
        let (mut market, mut rx, chat_id) = with_chat();
        let message = market.compose_message(&chat_id, "oops").unwrap();
        let message_id = message.id.clone();
        market.send_message(&chat_id, message).unwrap();
        drain(&mut rx);

        market.delete_message(&chat_id, &message_id, true).unwrap();

        let chat = market.chat(&chat_id).unwrap();
        for viewer in ["c1", "l1"] {
            let view = visible_messages(chat, viewer);
            assert_eq!(view.len(), 1);
            assert_eq!(view[0].text, DELETED_MESSAGE_PLACEHOLDER);
        }
        assert_eq!(chat.messages.len(), 1);

        match drain(&mut rx).as_slice() {
            [MirrorCommand::UpdateMessage { patch, .. }] => {
                assert_eq!(patch.deleted_for_everyone, Some(true));
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn test_delete_for_me_hides_only_for_viewer() {
        let (mut market, mut rx, chat_id) = with_chat();
        let message = market.compose_message(&chat_id, "private thought").unwrap();
        let message_id = message.id.clone();
        market.send_message(&chat_id, message).unwrap();
        drain(&mut rx);

        market.delete_message(&chat_id, &message_id, false).unwrap();
        market.delete_message(&chat_id, &message_id, false).unwrap();

        let chat = market.chat(&chat_id).unwrap();
        assert!(visible_messages(chat, "c1").is_empty());
        assert_eq!(visible_messages(chat, "l1")[0].text, "private thought");
        assert_eq!(chat.messages[0].deleted_for, vec!["c1".to_string()]);
        assert_eq!(drain(&mut rx).len(), 2);
    }

    #[test]
    fn test_delete_requires_session() {
        let (mut market, _rx, chat_id) = with_chat();
        market.session = None;
        assert!(matches!(
            market.delete_message(&chat_id, "msg-1", true),
            Err(ClientError::NotSignedIn)
        ));
    }
}
