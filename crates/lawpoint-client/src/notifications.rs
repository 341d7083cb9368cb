//! In-memory notifications raised as a side effect of domain commands.

use chrono::Utc;

use lawpoint_shared::constants::NOTIFICATION_ID_PREFIX;
use lawpoint_shared::models::Notification;
use lawpoint_shared::types::new_id;

use crate::state::Marketplace;

impl Marketplace {
    pub(crate) fn notify(&mut self, user_id: &str, message: impl Into<String>) {
        let notification = Notification {
            id: new_id(NOTIFICATION_ID_PREFIX),
            user_id: user_id.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            read: false,
        };
        tracing::debug!(user_id, message = %notification.message, "Notification raised");
        self.notifications.insert(0, notification);
    }

    /// Notifications addressed to `user_id`, newest first.
    pub fn notifications_for(&self, user_id: &str) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .collect()
    }

    pub fn unread_count(&self, user_id: &str) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .count()
    }

    pub fn mark_notifications_read(&mut self, user_id: &str) {
        for n in self.notifications.iter_mut().filter(|n| n.user_id == user_id) {
            n.read = true;
        }
    }
}
