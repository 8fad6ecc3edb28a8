//! Test fixtures for the notification core.
//!
//! Provides an in-memory [`NotificationRepository`] so delivery-path and
//! handler tests run without a database. Always compiled so integration
//! tests (in `tests/`) and downstream crates' tests can use it.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use moim_core::{Error, NewNotification, Notification, NotificationRepository, Result};

/// In-memory notification store with the same observable semantics as the
/// PostgreSQL implementation.
#[derive(Default)]
pub struct InMemoryNotificationRepository {
    rows: RwLock<Vec<Notification>>,
    next_id: AtomicI64,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Total number of stored rows, across all users.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn save(&self, new: NewNotification) -> Result<Notification> {
        let notification = Notification {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id: new.user_id,
            notification_type: new.notification_type,
            title: new.title,
            content: new.content,
            related: new.related,
            is_read: false,
            created_at: Utc::now(),
        };
        self.rows.write().await.push(notification.clone());
        Ok(notification)
    }

    async fn list_recent(&self, user_id: i64, limit: i64) -> Result<Vec<Notification>> {
        let rows = self.rows.read().await;
        let mut matching: Vec<Notification> = rows
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        // ids are monotonic, so they break created_at ties deterministically
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        matching.truncate(limit.max(0) as usize);
        Ok(matching)
    }

    async fn mark_all_read(&self, user_id: i64) -> Result<()> {
        let mut rows = self.rows.write().await;
        for n in rows.iter_mut().filter(|n| n.user_id == user_id) {
            n.is_read = true;
        }
        Ok(())
    }

    async fn has_unread(&self, user_id: i64) -> Result<bool> {
        let rows = self.rows.read().await;
        Ok(rows.iter().any(|n| n.user_id == user_id && !n.is_read))
    }

    async fn delete(&self, notification_id: i64, owner_user_id: i64) -> Result<()> {
        let mut rows = self.rows.write().await;
        match rows.iter().position(|n| n.id == notification_id) {
            None => Err(Error::NotificationNotFound(notification_id)),
            Some(idx) if rows[idx].user_id != owner_user_id => Err(Error::NotOwner {
                notification_id,
                user_id: owner_user_id,
            }),
            Some(idx) => {
                rows.remove(idx);
                Ok(())
            }
        }
    }
}
