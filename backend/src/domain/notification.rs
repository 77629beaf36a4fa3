//! User-facing notifications recorded by the referral workflow.

use chrono::{DateTime, Utc};

use super::{NotificationId, PersonName, ReferralStatus, UserId};

/// Category tag attached to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// An employee received a new direct request.
    RequestReceived,
    /// A student's request was decided.
    StatusUpdate,
    /// Operational messages.
    System,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequestReceived => "request_received",
            Self::StatusUpdate => "status_update",
            Self::System => "system",
        }
    }

    /// Parse the storage form, returning `None` for unknown tags.
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "request_received" => Some(Self::RequestReceived),
            "status_update" => Some(Self::StatusUpdate),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// A stored notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Unread notification addressed to `user_id`.
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::random(),
            user_id,
            message: message.into(),
            kind,
            is_read: false,
            created_at: now,
        }
    }

    /// Tell an employee a student asked them for a referral.
    pub fn request_received(employee: UserId, student: &PersonName, now: DateTime<Utc>) -> Self {
        Self::new(
            employee,
            NotificationKind::RequestReceived,
            format!("New referral request from {student}"),
            now,
        )
    }

    /// Tell a student an employee decided their request.
    pub fn status_update(
        student: UserId,
        status: ReferralStatus,
        employee: &PersonName,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(
            student,
            NotificationKind::StatusUpdate,
            format!("Your referral request was {status} by {employee}"),
            now,
        )
    }
}
