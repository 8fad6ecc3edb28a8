//! # moim-api
//!
//! HTTP surface of the moim notification subsystem: a REST inbox API plus
//! a server-sent-event push endpoint, sharing one channel registry and one
//! durable store through [`AppState`].

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{delete, get, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use moim_core::NotificationRepository;
use moim_notify::{ChannelRegistry, NotificationPublisher};

pub mod error;
pub mod handlers;
pub mod middleware;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Durable notification store.
    pub store: Arc<dyn NotificationRepository>,
    /// Registry of open push channels.
    pub registry: Arc<ChannelRegistry>,
    /// Persist-then-push publisher used by domain event producers.
    pub publisher: Arc<NotificationPublisher>,
}

impl AppState {
    pub fn new(store: Arc<dyn NotificationRepository>, registry: Arc<ChannelRegistry>) -> Self {
        let publisher = Arc::new(NotificationPublisher::new(
            Arc::clone(&store),
            Arc::clone(&registry),
        ));
        Self {
            store,
            registry,
            publisher,
        }
    }
}

/// OpenAPI documentation (utoipa metadata, used for Swagger UI configuration).
#[allow(dead_code)]
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Moim Notification API",
        version = "0.3.0",
        description = "Per-user real-time notification delivery: durable inbox plus live push channels"
    ),
    tags(
        (name = "Notifications", description = "Notification inbox and read-state operations"),
        (name = "Subscribe", description = "Live push channel subscription"),
        (name = "System", description = "Health checks")
    )
)]
struct ApiDoc;

async fn health() -> &'static str {
    "ok"
}

/// Build the application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/notifications/subscribe",
            get(handlers::notifications::subscribe),
        )
        .route("/api/notifications", get(handlers::notifications::list_recent))
        .route(
            "/api/notifications/unread",
            get(handlers::notifications::has_unread),
        )
        .route(
            "/api/notifications/read",
            put(handlers::notifications::mark_all_read),
        )
        .route(
            "/api/notifications/:notification_id",
            delete(handlers::notifications::delete),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::any())
                .allow_methods([Method::GET, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::HeaderName::from_static("x-user-id")]),
        )
        .with_state(state)
}
