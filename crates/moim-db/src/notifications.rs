//! Notification repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::warn;

use moim_core::{
    Error, NewNotification, Notification, NotificationRepository, NotificationType, RelatedRef,
    RelatedType, Result,
};

/// PostgreSQL implementation of [`NotificationRepository`].
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_notification(row: &PgRow) -> Result<Notification> {
        let id: i64 = row.try_get("notification_id")?;
        let user_id: i64 = row.try_get("user_id")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        let is_read: bool = row.try_get("is_read")?;
        let title: String = row.try_get("title")?;
        let content: String = row.try_get("content")?;

        let type_str: String = row.try_get("notification_type")?;
        let notification_type = NotificationType::parse(&type_str).ok_or_else(|| {
            Error::Internal(format!("unknown notification type in store: {type_str}"))
        })?;

        let related_id: Option<i64> = row.try_get("related_id")?;
        let related_type: Option<String> = row.try_get("related_type")?;
        let related = match (related_id, related_type.as_deref()) {
            (Some(rid), Some(kind_str)) => match RelatedType::parse(kind_str) {
                Some(kind) => Some(RelatedRef { id: rid, kind }),
                None => {
                    warn!(
                        subsystem = "db",
                        component = "notifications",
                        notification_id = id,
                        related_type = kind_str,
                        "Unknown related type in store; dropping reference"
                    );
                    None
                }
            },
            (None, None) => None,
            _ => {
                // legacy rows written before the both-or-neither constraint
                warn!(
                    subsystem = "db",
                    component = "notifications",
                    notification_id = id,
                    "Dangling half of a related reference; dropping it"
                );
                None
            }
        };

        Ok(Notification {
            id,
            user_id,
            notification_type,
            title,
            content,
            related,
            is_read,
            created_at,
        })
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn save(&self, new: NewNotification) -> Result<Notification> {
        let row = sqlx::query(
            r#"
            INSERT INTO notifications
                (user_id, notification_type, title, content, related_id, related_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING notification_id, created_at
            "#,
        )
        .bind(new.user_id)
        .bind(new.notification_type.as_str())
        .bind(&new.title)
        .bind(&new.content)
        .bind(new.related.map(|r| r.id))
        .bind(new.related.map(|r| r.kind.as_str()))
        .fetch_one(&self.pool)
        .await?;

        Ok(Notification {
            id: row.try_get("notification_id")?,
            user_id: new.user_id,
            notification_type: new.notification_type,
            title: new.title,
            content: new.content,
            related: new.related,
            is_read: false,
            created_at: row.try_get("created_at")?,
        })
    }

    async fn list_recent(&self, user_id: i64, limit: i64) -> Result<Vec<Notification>> {
        let rows = sqlx::query(
            r#"
            SELECT notification_id, user_id, notification_type, title, content,
                   related_id, related_type, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, notification_id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_notification).collect()
    }

    async fn mark_all_read(&self, user_id: i64) -> Result<()> {
        sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn has_unread(&self, user_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM notifications WHERE user_id = $1 AND is_read = FALSE)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn delete(&self, notification_id: i64, owner_user_id: i64) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE notification_id = $1 AND user_id = $2")
                .bind(notification_id)
                .bind(owner_user_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Zero rows: distinguish "someone else's notification" from "gone".
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM notifications WHERE notification_id = $1)",
        )
        .bind(notification_id)
        .fetch_one(&self.pool)
        .await?;

        if exists {
            Err(Error::NotOwner {
                notification_id,
                user_id: owner_user_id,
            })
        } else {
            Err(Error::NotificationNotFound(notification_id))
        }
    }
}
