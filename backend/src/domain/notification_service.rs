//! Read side of the notification sink.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{NotificationInbox, NotificationRepository, NotificationRepositoryError};
use crate::domain::{Error, Notification, NotificationId, UserId};

fn map_notification_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

#[derive(Clone)]
pub struct NotificationService<N> {
    notifications: Arc<N>,
}

impl<N> NotificationService<N> {
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl<N> NotificationInbox for NotificationService<N>
where
    N: NotificationRepository,
{
    async fn list(&self, user_id: &UserId) -> Result<Vec<Notification>, Error> {
        self.notifications
            .list_for_user(user_id)
            .await
            .map_err(map_notification_error)
    }

    async fn mark_read(&self, user_id: &UserId, id: &NotificationId) -> Result<Notification, Error> {
        self.notifications
            .mark_read(user_id, id)
            .await
            .map_err(map_notification_error)?
            .ok_or_else(|| Error::not_found(format!("notification {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::ports::MockNotificationRepository;
    use crate::domain::{ErrorCode, NotificationKind};
    use crate::test_support::MutableClock;
    use mockable::Clock;

    #[tokio::test]
    async fn mark_read_on_foreign_notification_is_not_found() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read().return_once(|_, _| Ok(None));

        let err = NotificationService::new(Arc::new(repo))
            .mark_read(&UserId::random(), &NotificationId::random())
            .await
            .expect_err("not found");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn mark_read_returns_the_flagged_notification() {
        let user = UserId::random();
        let mut note = Notification::new(
            user,
            NotificationKind::System,
            "welcome",
            MutableClock::fixed().utc(),
        );
        note.is_read = true;
        let id = note.id;
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read()
            .with(eq(user), eq(id))
            .return_once(move |_, _| Ok(Some(note)));

        let read = NotificationService::new(Arc::new(repo))
            .mark_read(&user, &id)
            .await
            .expect("marked");
        assert!(read.is_read);
    }

    #[tokio::test]
    async fn list_maps_query_failures_to_internal() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_list_for_user()
            .return_once(|_| Err(NotificationRepositoryError::query("boom")));

        let err = NotificationService::new(Arc::new(repo))
            .list(&UserId::random())
            .await
            .expect_err("failure");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
