//! # moim-notify
//!
//! Per-user real-time notification delivery core.
//!
//! Three components:
//! - [`channel::PushChannel`]: one open, long-lived push connection for a
//!   single subscriber, with completion/timeout/error terminal states.
//! - [`registry::ChannelRegistry`]: user-to-channel map with at-most-one
//!   open channel per user and automatic cleanup on terminal transitions.
//! - [`publisher::NotificationPublisher`]: persist-then-push orchestration
//!   for domain events: durability is guaranteed, live delivery is
//!   best-effort.

pub mod channel;
pub mod publisher;
pub mod registry;

// Always compiled so integration tests and downstream crates can use it.
pub mod test_fixtures;

pub use channel::{ChannelError, ChannelStream, CloseReason, PushChannel, PushEvent, DEFAULT_TIMEOUT};
pub use publisher::NotificationPublisher;
pub use registry::{
    ChannelRegistry, CONNECT_EVENT_ID, CONNECT_EVENT_NAME, NOTIFICATION_EVENT_NAME,
};
pub use test_fixtures::InMemoryNotificationRepository;
