//! Core domain models for the moim notification subsystem.
//!
//! A [`Notification`] is a durable record of something the user should be
//! informed of, independent of whether it was ever live-pushed. Records are
//! immutable after creation except for the read flag, which only moves
//! false → true through the repository's bulk mark-read operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Kind of event a notification was created for.
///
/// Stored and serialized as SCREAMING_SNAKE_CASE strings so the database
/// column and the JSON wire form stay identical to the mobile client's
/// expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    CrewInvite,
    ScheduleReminder,
    CrewSchedule,
    ActivityRecommendation,
    CrewMemberJoin,
    CrewScheduleUpdate,
    RatingRequest,
    CrewDisbanded,
    CrewCreated,
    CrewScheduleDelete,
}

impl NotificationType {
    /// Stable string form used for the database column.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::CrewInvite => "CREW_INVITE",
            NotificationType::ScheduleReminder => "SCHEDULE_REMINDER",
            NotificationType::CrewSchedule => "CREW_SCHEDULE",
            NotificationType::ActivityRecommendation => "ACTIVITY_RECOMMENDATION",
            NotificationType::CrewMemberJoin => "CREW_MEMBER_JOIN",
            NotificationType::CrewScheduleUpdate => "CREW_SCHEDULE_UPDATE",
            NotificationType::RatingRequest => "RATING_REQUEST",
            NotificationType::CrewDisbanded => "CREW_DISBANDED",
            NotificationType::CrewCreated => "CREW_CREATED",
            NotificationType::CrewScheduleDelete => "CREW_SCHEDULE_DELETE",
        }
    }

    /// Parse the stored string form. Returns None for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREW_INVITE" => Some(NotificationType::CrewInvite),
            "SCHEDULE_REMINDER" => Some(NotificationType::ScheduleReminder),
            "CREW_SCHEDULE" => Some(NotificationType::CrewSchedule),
            "ACTIVITY_RECOMMENDATION" => Some(NotificationType::ActivityRecommendation),
            "CREW_MEMBER_JOIN" => Some(NotificationType::CrewMemberJoin),
            "CREW_SCHEDULE_UPDATE" => Some(NotificationType::CrewScheduleUpdate),
            "RATING_REQUEST" => Some(NotificationType::RatingRequest),
            "CREW_DISBANDED" => Some(NotificationType::CrewDisbanded),
            "CREW_CREATED" => Some(NotificationType::CrewCreated),
            "CREW_SCHEDULE_DELETE" => Some(NotificationType::CrewScheduleDelete),
            _ => None,
        }
    }
}

/// Kind of domain object a notification references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelatedType {
    Crew,
    Schedule,
    CrewSchedule,
    Activity,
    User,
}

impl RelatedType {
    /// Stable string form used for the database column.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelatedType::Crew => "CREW",
            RelatedType::Schedule => "SCHEDULE",
            RelatedType::CrewSchedule => "CREW_SCHEDULE",
            RelatedType::Activity => "ACTIVITY",
            RelatedType::User => "USER",
        }
    }

    /// Parse the stored string form. Returns None for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREW" => Some(RelatedType::Crew),
            "SCHEDULE" => Some(RelatedType::Schedule),
            "CREW_SCHEDULE" => Some(RelatedType::CrewSchedule),
            "ACTIVITY" => Some(RelatedType::Activity),
            "USER" => Some(RelatedType::User),
            _ => None,
        }
    }
}

/// Reference to the domain object that triggered a notification.
///
/// Modeled as a single struct so the id/type pair is either fully present or
/// fully absent, so a notification can never carry a dangling half-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RelatedRef {
    pub id: i64,
    pub kind: RelatedType,
}

impl RelatedRef {
    pub fn crew(id: i64) -> Self {
        Self {
            id,
            kind: RelatedType::Crew,
        }
    }

    pub fn schedule(id: i64) -> Self {
        Self {
            id,
            kind: RelatedType::Schedule,
        }
    }

    pub fn crew_schedule(id: i64) -> Self {
        Self {
            id,
            kind: RelatedType::CrewSchedule,
        }
    }

    pub fn activity(id: i64) -> Self {
        Self {
            id,
            kind: RelatedType::Activity,
        }
    }
}

// =============================================================================
// NOTIFICATION ENTITY
// =============================================================================

/// Persisted notification record.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Notification {
    /// Store-assigned identity, never reused.
    pub id: i64,
    /// Owning user (immutable).
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: String,
    /// Domain object that triggered this notification, if any.
    pub related: Option<RelatedRef>,
    /// Read flag; only transitions false → true.
    pub is_read: bool,
    /// Set once by the store at creation.
    pub created_at: DateTime<Utc>,
}

/// Notification creation request: everything except store-assigned fields.
///
/// Constructed exclusively through the per-event-type template constructors
/// below, which mirror the product's fixed message strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: String,
    pub related: Option<RelatedRef>,
}

impl NewNotification {
    /// 크루 초대: the user was invited to a crew.
    pub fn crew_invite(user_id: i64, crew_name: &str, crew_id: i64) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::CrewInvite,
            title: "크루 초대".to_string(),
            content: format!("{} 크루에 초대되었습니다.", crew_name),
            related: Some(RelatedRef::crew(crew_id)),
        }
    }

    /// 크루 가입: the user's crew membership was completed.
    pub fn crew_member_join(user_id: i64, crew_name: &str, crew_id: i64) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::CrewMemberJoin,
            title: "크루 가입".to_string(),
            content: format!("{} 크루에 가입되었습니다.", crew_name),
            related: Some(RelatedRef::crew(crew_id)),
        }
    }

    /// 크루 일정: a crew schedule was created.
    pub fn crew_schedule_created(
        user_id: i64,
        crew_name: &str,
        activity_name: &str,
        crew_schedule_id: i64,
    ) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::CrewSchedule,
            title: "크루 일정".to_string(),
            content: format!(
                "{} 크루에서 {} 일정이 생성되었습니다.",
                crew_name, activity_name
            ),
            related: Some(RelatedRef::crew_schedule(crew_schedule_id)),
        }
    }

    /// 크루 일정 수정: a crew schedule was changed.
    pub fn crew_schedule_updated(
        user_id: i64,
        crew_name: &str,
        activity_name: &str,
        crew_schedule_id: i64,
    ) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::CrewScheduleUpdate,
            title: "크루 일정 수정".to_string(),
            content: format!(
                "[{}] 크루의 {} 일정이 변경되었습니다.",
                crew_name, activity_name
            ),
            related: Some(RelatedRef::crew_schedule(crew_schedule_id)),
        }
    }

    /// 크루 일정 삭제: a crew schedule was cancelled.
    pub fn crew_schedule_deleted(
        user_id: i64,
        crew_name: &str,
        activity_name: &str,
        crew_id: i64,
    ) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::CrewScheduleDelete,
            title: "크루 일정 삭제".to_string(),
            content: format!(
                "[{}] 크루의 {} 일정이 취소되었습니다.",
                crew_name, activity_name
            ),
            related: Some(RelatedRef::crew(crew_id)),
        }
    }

    /// 크루 해체: the crew was disbanded.
    ///
    /// Carries no related reference: the crew no longer exists, so there is
    /// nothing for the client to navigate to.
    pub fn crew_disbanded(user_id: i64, crew_name: &str) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::CrewDisbanded,
            title: format!("[{}] 크루 해체", crew_name),
            content: "크루가 해체되어 활동이 종료되었습니다.".to_string(),
            related: None,
        }
    }

    /// 생성 완료: the user's new crew was created.
    pub fn crew_created(user_id: i64, crew_name: &str, crew_id: i64) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::CrewCreated,
            title: format!("[{}] 생성 완료", crew_name),
            content: "새로운 크루 생성을 축하합니다! 이제 멤버를 초대하거나 일정을 만들어보세요."
                .to_string(),
            related: Some(RelatedRef::crew(crew_id)),
        }
    }

    /// 일정 알림: a personal schedule is about to start.
    pub fn schedule_reminder(user_id: i64, activity_name: &str, schedule_id: i64) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::ScheduleReminder,
            title: "일정 알림".to_string(),
            content: format!("{} 활동 일정이 곧 시작됩니다.", activity_name),
            related: Some(RelatedRef::schedule(schedule_id)),
        }
    }

    /// 활동 추천: an activity recommendation for today's weather.
    pub fn activity_recommendation(user_id: i64, activity_name: &str, activity_id: i64) -> Self {
        Self {
            user_id,
            notification_type: NotificationType::ActivityRecommendation,
            title: "활동 추천".to_string(),
            content: format!("오늘 날씨에 {} 활동을 추천드립니다.", activity_name),
            related: Some(RelatedRef::activity(activity_id)),
        }
    }
}

// =============================================================================
// PUBLIC PROJECTION
// =============================================================================

/// Public projection of a notification, as listed and live-pushed to clients.
///
/// Deliberately excludes the owner field: the subscriber already is the
/// owner, and leaking user ids through the related-entity surface is not
/// wanted. Field names are camelCase on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_type: Option<RelatedType>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationResponse {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            notification_type: n.notification_type,
            title: n.title.clone(),
            content: n.content.clone(),
            related_id: n.related.map(|r| r.id),
            related_type: n.related.map(|r| r.kind),
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(new: NewNotification, id: i64) -> Notification {
        Notification {
            id,
            user_id: new.user_id,
            notification_type: new.notification_type,
            title: new.title,
            content: new.content,
            related: new.related,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_notification_type_round_trip() {
        for ty in [
            NotificationType::CrewInvite,
            NotificationType::ScheduleReminder,
            NotificationType::CrewSchedule,
            NotificationType::ActivityRecommendation,
            NotificationType::CrewMemberJoin,
            NotificationType::CrewScheduleUpdate,
            NotificationType::RatingRequest,
            NotificationType::CrewDisbanded,
            NotificationType::CrewCreated,
            NotificationType::CrewScheduleDelete,
        ] {
            assert_eq!(NotificationType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(NotificationType::parse("NOT_A_TYPE"), None);
    }

    #[test]
    fn test_related_type_round_trip() {
        for ty in [
            RelatedType::Crew,
            RelatedType::Schedule,
            RelatedType::CrewSchedule,
            RelatedType::Activity,
            RelatedType::User,
        ] {
            assert_eq!(RelatedType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(RelatedType::parse(""), None);
    }

    #[test]
    fn test_crew_member_join_template() {
        let new = NewNotification::crew_member_join(42, "Morning Runners", 7);
        assert_eq!(new.user_id, 42);
        assert_eq!(new.notification_type, NotificationType::CrewMemberJoin);
        assert_eq!(new.title, "크루 가입");
        assert_eq!(new.content, "Morning Runners 크루에 가입되었습니다.");
        assert_eq!(new.related, Some(RelatedRef::crew(7)));
    }

    #[test]
    fn test_crew_invite_template() {
        let new = NewNotification::crew_invite(1, "활동하조", 3);
        assert_eq!(new.title, "크루 초대");
        assert_eq!(new.content, "활동하조 크루에 초대되었습니다.");
        assert_eq!(new.related, Some(RelatedRef::crew(3)));
    }

    #[test]
    fn test_crew_schedule_templates() {
        let created = NewNotification::crew_schedule_created(1, "농구하조", "농구", 20);
        assert_eq!(created.title, "크루 일정");
        assert_eq!(created.content, "농구하조 크루에서 농구 일정이 생성되었습니다.");
        assert_eq!(created.related, Some(RelatedRef::crew_schedule(20)));

        let updated = NewNotification::crew_schedule_updated(1, "농구하조", "농구", 20);
        assert_eq!(updated.title, "크루 일정 수정");
        assert_eq!(updated.content, "[농구하조] 크루의 농구 일정이 변경되었습니다.");

        let deleted = NewNotification::crew_schedule_deleted(1, "농구하조", "농구", 5);
        assert_eq!(deleted.title, "크루 일정 삭제");
        assert_eq!(deleted.content, "[농구하조] 크루의 농구 일정이 취소되었습니다.");
        assert_eq!(deleted.related, Some(RelatedRef::crew(5)));
    }

    #[test]
    fn test_crew_disbanded_has_no_related_ref() {
        let new = NewNotification::crew_disbanded(1, "활동하조");
        assert_eq!(new.title, "[활동하조] 크루 해체");
        assert_eq!(new.content, "크루가 해체되어 활동이 종료되었습니다.");
        assert!(new.related.is_none());
    }

    #[test]
    fn test_reminder_and_recommendation_templates() {
        let reminder = NewNotification::schedule_reminder(1, "등산", 9);
        assert_eq!(reminder.title, "일정 알림");
        assert_eq!(reminder.content, "등산 활동 일정이 곧 시작됩니다.");
        assert_eq!(reminder.related, Some(RelatedRef::schedule(9)));

        let reco = NewNotification::activity_recommendation(1, "러닝", 11);
        assert_eq!(reco.title, "활동 추천");
        assert_eq!(reco.content, "오늘 날씨에 러닝 활동을 추천드립니다.");
        assert_eq!(reco.related, Some(RelatedRef::activity(11)));
    }

    #[test]
    fn test_response_projection_fields() {
        let n = stored(NewNotification::crew_member_join(42, "Morning Runners", 7), 100);
        let resp = NotificationResponse::from(&n);
        assert_eq!(resp.id, 100);
        assert_eq!(resp.notification_type, NotificationType::CrewMemberJoin);
        assert_eq!(resp.related_id, Some(7));
        assert_eq!(resp.related_type, Some(RelatedType::Crew));
        assert!(!resp.is_read);
    }

    #[test]
    fn test_response_json_wire_format() {
        let n = stored(NewNotification::crew_member_join(42, "Morning Runners", 7), 100);
        let json = serde_json::to_value(NotificationResponse::from(&n)).unwrap();
        assert_eq!(json["id"], 100);
        assert_eq!(json["type"], "CREW_MEMBER_JOIN");
        assert_eq!(json["title"], "크루 가입");
        assert_eq!(json["relatedId"], 7);
        assert_eq!(json["relatedType"], "CREW");
        assert_eq!(json["isRead"], false);
        assert!(json["createdAt"].is_string());
        // owner never crosses the wire
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn test_response_json_omits_absent_related_ref() {
        let n = stored(NewNotification::crew_disbanded(1, "활동하조"), 5);
        let json = serde_json::to_value(NotificationResponse::from(&n)).unwrap();
        assert!(json.get("relatedId").is_none());
        assert!(json.get("relatedType").is_none());
    }
}
