//! Notification endpoints.
//!
//! The subscribe endpoint upgrades the request to a server-sent event
//! stream backed by the channel registry; the rest are plain JSON CRUD
//! over the durable store.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::{Stream, StreamExt};
use tracing::info;

use moim_core::NotificationResponse;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::AppState;

/// How many notifications the inbox endpoint returns, newest first.
const RECENT_LIMIT: i64 = 10;

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// GET /api/notifications/subscribe
///
/// Opens the caller's push channel. Any existing channel for the same
/// user is replaced; its stream ends shortly after.
pub async fn subscribe(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!(
        subsystem = "api",
        component = "notifications",
        op = "subscribe",
        user_id,
        "Opening push channel"
    );

    let stream = state.registry.subscribe(user_id).map(|push| {
        Ok::<_, Infallible>(
            Event::default()
                .id(push.id)
                .event(push.name)
                .data(push.data),
        )
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(KEEPALIVE_INTERVAL)
            .text("keepalive"),
    )
}

/// GET /api/notifications
pub async fn list_recent(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let notifications = state.store.list_recent(user_id, RECENT_LIMIT).await?;
    let body = notifications.iter().map(NotificationResponse::from).collect();
    Ok(Json(body))
}

/// GET /api/notifications/unread
pub async fn has_unread(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<bool>, ApiError> {
    let unread = state.store.has_unread(user_id).await?;
    Ok(Json(unread))
}

/// PUT /api/notifications/read
pub async fn mark_all_read(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<StatusCode, ApiError> {
    state.store.mark_all_read(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/notifications/:notification_id
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(notification_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(notification_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
