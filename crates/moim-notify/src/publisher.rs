//! Notification publisher: the only place notification records are created.
//!
//! Every operation performs the same two steps: persist the record, then
//! best-effort push it over the owner's open channel. Durability is
//! guaranteed; a store failure propagates to the caller. Live delivery is
//! not: the push outcome is logged and discarded, and a disconnected user
//! picks the record up through the list/unread endpoints instead.

use std::sync::Arc;

use tracing::{debug, info};

use moim_core::{NewNotification, Notification, NotificationRepository, NotificationResponse, Result};

use crate::registry::{ChannelRegistry, NOTIFICATION_EVENT_NAME};

/// Persist-then-push orchestrator for domain events.
///
/// Domain services (crew, schedule, recommendation) call one operation per
/// event kind, synchronously after their own persistence commits.
pub struct NotificationPublisher {
    store: Arc<dyn NotificationRepository>,
    registry: Arc<ChannelRegistry>,
}

impl NotificationPublisher {
    pub fn new(store: Arc<dyn NotificationRepository>, registry: Arc<ChannelRegistry>) -> Self {
        Self { store, registry }
    }

    /// The user was invited to a crew.
    pub async fn notify_crew_invite(
        &self,
        user_id: i64,
        crew_name: &str,
        crew_id: i64,
    ) -> Result<Notification> {
        self.persist_then_push(NewNotification::crew_invite(user_id, crew_name, crew_id))
            .await
    }

    /// The user's crew membership was completed.
    pub async fn notify_crew_member_join(
        &self,
        user_id: i64,
        crew_name: &str,
        crew_id: i64,
    ) -> Result<Notification> {
        self.persist_then_push(NewNotification::crew_member_join(user_id, crew_name, crew_id))
            .await
    }

    /// A crew schedule was created.
    pub async fn notify_crew_schedule_created(
        &self,
        user_id: i64,
        crew_name: &str,
        activity_name: &str,
        crew_schedule_id: i64,
    ) -> Result<Notification> {
        self.persist_then_push(NewNotification::crew_schedule_created(
            user_id,
            crew_name,
            activity_name,
            crew_schedule_id,
        ))
        .await
    }

    /// A crew schedule was changed.
    pub async fn notify_crew_schedule_updated(
        &self,
        user_id: i64,
        crew_name: &str,
        activity_name: &str,
        crew_schedule_id: i64,
    ) -> Result<Notification> {
        self.persist_then_push(NewNotification::crew_schedule_updated(
            user_id,
            crew_name,
            activity_name,
            crew_schedule_id,
        ))
        .await
    }

    /// A crew schedule was cancelled.
    pub async fn notify_crew_schedule_deleted(
        &self,
        user_id: i64,
        crew_name: &str,
        activity_name: &str,
        crew_id: i64,
    ) -> Result<Notification> {
        self.persist_then_push(NewNotification::crew_schedule_deleted(
            user_id,
            crew_name,
            activity_name,
            crew_id,
        ))
        .await
    }

    /// The user's crew was disbanded.
    pub async fn notify_crew_disbanded(
        &self,
        user_id: i64,
        crew_name: &str,
    ) -> Result<Notification> {
        self.persist_then_push(NewNotification::crew_disbanded(user_id, crew_name))
            .await
    }

    /// The user's new crew was created.
    pub async fn notify_crew_created(
        &self,
        user_id: i64,
        crew_name: &str,
        crew_id: i64,
    ) -> Result<Notification> {
        self.persist_then_push(NewNotification::crew_created(user_id, crew_name, crew_id))
            .await
    }

    /// A personal schedule is about to start.
    pub async fn notify_schedule_reminder(
        &self,
        user_id: i64,
        activity_name: &str,
        schedule_id: i64,
    ) -> Result<Notification> {
        self.persist_then_push(NewNotification::schedule_reminder(
            user_id,
            activity_name,
            schedule_id,
        ))
        .await
    }

    /// An activity recommendation for today's weather.
    pub async fn notify_activity_recommendation(
        &self,
        user_id: i64,
        activity_name: &str,
        activity_id: i64,
    ) -> Result<Notification> {
        self.persist_then_push(NewNotification::activity_recommendation(
            user_id,
            activity_name,
            activity_id,
        ))
        .await
    }

    /// Save the record, then attempt live delivery. The push result is
    /// deliberately discarded: the record is already durable, and the
    /// list/unread endpoints are the fallback delivery path.
    async fn persist_then_push(&self, new: NewNotification) -> Result<Notification> {
        let notification = self.store.save(new).await?;
        let response = NotificationResponse::from(&notification);

        let delivered = self.registry.push(
            notification.user_id,
            &notification.id.to_string(),
            NOTIFICATION_EVENT_NAME,
            &response,
        );

        if delivered {
            info!(
                subsystem = "notify",
                component = "publisher",
                op = "publish",
                user_id = notification.user_id,
                notification_id = notification.id,
                notification_type = notification.notification_type.as_str(),
                "Notification pushed"
            );
        } else {
            debug!(
                subsystem = "notify",
                component = "publisher",
                op = "publish",
                user_id = notification.user_id,
                notification_id = notification.id,
                notification_type = notification.notification_type.as_str(),
                "Notification stored; user not connected"
            );
        }

        Ok(notification)
    }
}
