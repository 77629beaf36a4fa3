//! Driving port exposing a caller's notifications.

use async_trait::async_trait;

use crate::domain::{Error, Notification, NotificationId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationInbox: Send + Sync {
    /// Notifications for `user_id`, newest first.
    async fn list(&self, user_id: &UserId) -> Result<Vec<Notification>, Error>;

    /// Mark one of the caller's notifications as read.
    async fn mark_read(
        &self,
        user_id: &UserId,
        id: &NotificationId,
    ) -> Result<Notification, Error>;
}
