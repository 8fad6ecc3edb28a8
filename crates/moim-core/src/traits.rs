//! Repository traits for the moim notification subsystem.
//!
//! These traits define the persistence interface that concrete
//! implementations must satisfy, enabling pluggable backends and
//! testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewNotification, Notification};

/// Durable store for notification records.
///
/// The store is independent of live-push concerns: a record saved here is
/// retrievable through `list_recent` whether or not a live push ever
/// happened.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a new notification, assigning its identity and creation
    /// timestamp. Returns the stored form.
    async fn save(&self, new: NewNotification) -> Result<Notification>;

    /// The user's most recent notifications, newest first, at most `limit`.
    async fn list_recent(&self, user_id: i64, limit: i64) -> Result<Vec<Notification>>;

    /// Mark every currently-unread notification of `user_id` as read.
    /// Idempotent; a second call with nothing left to mark is not an error.
    async fn mark_all_read(&self, user_id: i64) -> Result<()>;

    /// Whether the user has at least one unread notification.
    async fn has_unread(&self, user_id: i64) -> Result<bool>;

    /// Delete a notification owned by `owner_user_id`.
    ///
    /// Fails with [`crate::Error::NotOwner`] when the record exists under a
    /// different owner, and [`crate::Error::NotificationNotFound`] when it
    /// does not exist at all.
    async fn delete(&self, notification_id: i64, owner_user_id: i64) -> Result<()>;
}
