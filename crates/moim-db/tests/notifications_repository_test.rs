//! Integration tests for the PostgreSQL notification repository.
//!
//! Requires a running Postgres with the notifications migration applied;
//! configure via `DATABASE_URL` (see `test_fixtures`). Run single-threaded:
//! `cargo test -p moim-db -- --test-threads=1`.

use moim_db::test_fixtures::TestDatabase;
use moim_db::{
    Error, NewNotification, NotificationRepository, NotificationType, RelatedRef, RelatedType,
};

#[tokio::test]
async fn test_save_assigns_identity_and_timestamp() {
    let fixture = TestDatabase::new().await;
    let repo = &fixture.db.notifications;

    let stored = repo
        .save(NewNotification::crew_member_join(42, "Morning Runners", 7))
        .await
        .unwrap();

    assert!(stored.id > 0);
    assert_eq!(stored.user_id, 42);
    assert_eq!(stored.notification_type, NotificationType::CrewMemberJoin);
    assert_eq!(stored.related, Some(RelatedRef::crew(7)));
    assert!(!stored.is_read);
}

#[tokio::test]
async fn test_round_trip_preserves_fields() {
    let fixture = TestDatabase::new().await;
    let repo = &fixture.db.notifications;

    let stored = repo
        .save(NewNotification::crew_schedule_created(1, "농구하조", "농구", 20))
        .await
        .unwrap();

    let listed = repo.list_recent(1, 10).await.unwrap();
    assert_eq!(listed.len(), 1);
    let n = &listed[0];
    assert_eq!(n.id, stored.id);
    assert_eq!(n.title, "크루 일정");
    assert_eq!(n.content, "농구하조 크루에서 농구 일정이 생성되었습니다.");
    assert_eq!(n.related.unwrap().kind, RelatedType::CrewSchedule);
    assert_eq!(n.created_at, stored.created_at);
}

#[tokio::test]
async fn test_save_without_related_ref() {
    let fixture = TestDatabase::new().await;
    let repo = &fixture.db.notifications;

    let stored = repo
        .save(NewNotification::crew_disbanded(1, "활동하조"))
        .await
        .unwrap();
    assert!(stored.related.is_none());

    let listed = repo.list_recent(1, 10).await.unwrap();
    assert!(listed[0].related.is_none());
}

#[tokio::test]
async fn test_list_recent_orders_and_limits() {
    let fixture = TestDatabase::new().await;
    let repo = &fixture.db.notifications;

    for i in 0..12 {
        repo.save(NewNotification::schedule_reminder(5, &format!("활동 {i}"), i))
            .await
            .unwrap();
    }

    let listed = repo.list_recent(5, 10).await.unwrap();
    assert_eq!(listed.len(), 10);
    for pair in listed.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
        assert!(pair[0].id > pair[1].id);
    }
}

#[tokio::test]
async fn test_unread_lifecycle() {
    let fixture = TestDatabase::new().await;
    let repo = &fixture.db.notifications;

    assert!(!repo.has_unread(9).await.unwrap());

    repo.save(NewNotification::crew_invite(9, "활동하조", 3))
        .await
        .unwrap();
    repo.save(NewNotification::crew_invite(9, "농구하조", 4))
        .await
        .unwrap();
    assert!(repo.has_unread(9).await.unwrap());

    repo.mark_all_read(9).await.unwrap();
    assert!(!repo.has_unread(9).await.unwrap());
    for n in repo.list_recent(9, 10).await.unwrap() {
        assert!(n.is_read);
    }

    // idempotent with nothing left to mark
    repo.mark_all_read(9).await.unwrap();
    assert!(!repo.has_unread(9).await.unwrap());
}

#[tokio::test]
async fn test_delete_owner_scoped() {
    let fixture = TestDatabase::new().await;
    let repo = &fixture.db.notifications;

    let stored = repo
        .save(NewNotification::crew_invite(1, "활동하조", 3))
        .await
        .unwrap();

    match repo.delete(stored.id, 2).await {
        Err(Error::NotOwner { .. }) => {}
        other => panic!("expected NotOwner, got {other:?}"),
    }
    assert_eq!(repo.list_recent(1, 10).await.unwrap().len(), 1);

    repo.delete(stored.id, 1).await.unwrap();
    assert!(repo.list_recent(1, 10).await.unwrap().is_empty());

    match repo.delete(stored.id, 1).await {
        Err(Error::NotificationNotFound(_)) => {}
        other => panic!("expected NotificationNotFound, got {other:?}"),
    }
}
