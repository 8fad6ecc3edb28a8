//! Channel registry: the single source of truth for which users are
//! currently reachable for live push, and through which channel.
//!
//! At most one channel per user: a new subscription replaces any prior
//! entry. The registry does not explicitly close the replaced channel, but
//! dropping its sending half ends the old stream on its next poll instead of
//! letting it linger until its timeout.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::channel::{ChannelStream, CloseReason, PushChannel, DEFAULT_TIMEOUT};

/// Event id of the synthetic handshake event.
pub const CONNECT_EVENT_ID: &str = "0";

/// Event name of the synthetic handshake event.
pub const CONNECT_EVENT_NAME: &str = "connect";

/// Event name carried by every real notification push.
pub const NOTIFICATION_EVENT_NAME: &str = "notification";

/// Acknowledgment payload of the handshake event.
const CONNECT_PAYLOAD: &str = "Connected";

/// In-memory mapping from user identity to their open push channel.
///
/// Shared mutable state between subscription handling and domain-event
/// publishing; every operation takes the map lock, so concurrent
/// subscribe/push for the same user see either the old or the new channel,
/// never a torn state.
pub struct ChannelRegistry {
    channels: Mutex<HashMap<i64, PushChannel>>,
    timeout: Duration,
    // Handed to channel terminal hooks; Weak so a closed registry cannot be
    // kept alive by channels still draining.
    weak_self: Weak<ChannelRegistry>,
}

impl ChannelRegistry {
    /// Create a registry whose channels live at most `timeout`.
    pub fn new(timeout: Duration) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            channels: Mutex::new(HashMap::new()),
            timeout,
            weak_self: weak.clone(),
        })
    }

    /// Create a registry with the default 10-minute channel lifetime.
    pub fn with_default_timeout() -> Arc<Self> {
        Self::new(DEFAULT_TIMEOUT)
    }

    /// Open a new push channel for `user_id`, replacing any prior entry, and
    /// return the stream the transport layer keeps open.
    ///
    /// The channel's terminal transitions (completed, timed out, errored)
    /// each unregister it; the synthetic `connect` event is sent before the
    /// stream is returned so intermediaries see bytes on an otherwise empty
    /// response immediately.
    pub fn subscribe(&self, user_id: i64) -> ChannelStream {
        let registry = self.weak_self.clone();
        let (channel, stream) = PushChannel::open(self.timeout, move |channel_id, reason| {
            if let Some(registry) = registry.upgrade() {
                registry.remove_terminated(user_id, channel_id, reason);
            }
        });

        let channel_id = channel.id();
        let connect = channel.send(CONNECT_EVENT_ID, CONNECT_EVENT_NAME, &CONNECT_PAYLOAD);

        {
            let mut channels = self.lock_channels();
            channels.insert(user_id, channel);
            debug!(
                subsystem = "notify",
                component = "registry",
                op = "subscribe",
                user_id,
                channel_id = %channel_id,
                connection_count = channels.len(),
                "Push channel registered"
            );
        }

        // Fresh bounded queue; this only fails if the stream was already
        // dropped, in which case the terminal hook has done the cleanup.
        if let Err(e) = connect {
            warn!(
                subsystem = "notify",
                component = "registry",
                op = "subscribe",
                user_id,
                error = %e,
                "Failed to send connect event"
            );
        }

        stream
    }

    /// Remove the mapping for `user_id` if present. Idempotent and safe to
    /// call concurrently.
    pub fn unregister(&self, user_id: i64) {
        let removed = self.lock_channels().remove(&user_id).is_some();
        if removed {
            debug!(
                subsystem = "notify",
                component = "registry",
                op = "unregister",
                user_id,
                "Push channel unregistered"
            );
        }
    }

    /// Terminal-hook removal: drops the entry only while it still maps to
    /// the terminating channel, so a replaced channel reaching its timeout
    /// cannot evict its replacement.
    fn remove_terminated(&self, user_id: i64, channel_id: Uuid, reason: CloseReason) {
        let mut channels = self.lock_channels();
        if channels
            .get(&user_id)
            .is_some_and(|ch| ch.id() == channel_id)
        {
            channels.remove(&user_id);
            debug!(
                subsystem = "notify",
                component = "registry",
                op = "unregister",
                user_id,
                channel_id = %channel_id,
                reason = ?reason,
                connection_count = channels.len(),
                "Push channel closed"
            );
        }
    }

    /// Best-effort delivery of one event to `user_id`'s open channel.
    ///
    /// Returns false when the user has no channel (an expected, common case)
    /// or when the send fails; the failing channel unregisters itself
    /// through its own error hook. Never panics or returns an error.
    pub fn push<T: Serialize>(
        &self,
        user_id: i64,
        event_id: &str,
        event_name: &str,
        payload: &T,
    ) -> bool {
        // Clone the channel out so the lock is released before sending; a
        // send failure re-enters the registry through the terminal hook.
        let channel = self.lock_channels().get(&user_id).cloned();

        let Some(channel) = channel else {
            return false;
        };

        match channel.send(event_id, event_name, payload) {
            Ok(()) => true,
            Err(e) => {
                debug!(
                    subsystem = "notify",
                    component = "registry",
                    op = "push",
                    user_id,
                    channel_id = %channel.id(),
                    error = %e,
                    "Push failed; channel closed"
                );
                false
            }
        }
    }

    /// Whether `user_id` currently has an open channel.
    pub fn is_connected(&self, user_id: i64) -> bool {
        self.lock_channels().contains_key(&user_id)
    }

    /// Number of open channels across all users.
    pub fn connection_count(&self) -> usize {
        self.lock_channels().len()
    }

    fn lock_channels(&self) -> std::sync::MutexGuard<'_, HashMap<i64, PushChannel>> {
        // A poisoned lock only means another thread panicked mid-operation;
        // the map itself is still structurally sound.
        self.channels.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_push_without_channel_is_false() {
        let registry = ChannelRegistry::with_default_timeout();
        assert!(!registry.push(99, "1", NOTIFICATION_EVENT_NAME, &"payload"));
    }

    #[tokio::test]
    async fn test_subscribe_sends_connect_first() {
        let registry = ChannelRegistry::with_default_timeout();
        let mut stream = registry.subscribe(7);

        let event = stream.next().await.unwrap();
        assert_eq!(event.id, CONNECT_EVENT_ID);
        assert_eq!(event.name, CONNECT_EVENT_NAME);
        assert_eq!(event.data, "\"Connected\"");
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let registry = ChannelRegistry::with_default_timeout();
        let _stream = registry.subscribe(7);
        assert!(registry.is_connected(7));

        registry.unregister(7);
        assert!(!registry.is_connected(7));
        registry.unregister(7); // no-op
        assert!(!registry.is_connected(7));
    }

    #[tokio::test]
    async fn test_replacement_keeps_one_entry_and_routes_to_new_channel() {
        let registry = ChannelRegistry::with_default_timeout();
        let mut old = registry.subscribe(7);
        assert_eq!(old.next().await.unwrap().name, CONNECT_EVENT_NAME);

        let mut new = registry.subscribe(7);
        assert_eq!(registry.connection_count(), 1);

        assert!(registry.push(7, "1", NOTIFICATION_EVENT_NAME, &"hello"));
        assert_eq!(new.next().await.unwrap().name, CONNECT_EVENT_NAME);
        assert_eq!(new.next().await.unwrap().data, "\"hello\"");

        // the replaced stream ends instead of receiving the push
        assert_eq!(old.next().await, None);
        // its completion must not evict the replacement entry
        assert!(registry.is_connected(7));
    }

    #[tokio::test]
    async fn test_drop_unregisters() {
        let registry = ChannelRegistry::with_default_timeout();
        let stream = registry.subscribe(7);
        assert!(registry.is_connected(7));

        drop(stream);
        assert!(!registry.is_connected(7));
        assert!(!registry.push(7, "1", NOTIFICATION_EVENT_NAME, &"late"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_unregisters() {
        let registry = ChannelRegistry::new(Duration::from_secs(1));
        let mut stream = registry.subscribe(7);
        assert_eq!(stream.next().await.unwrap().name, CONNECT_EVENT_NAME);

        assert_eq!(stream.next().await, None);
        assert!(!registry.is_connected(7));
    }

    #[tokio::test]
    async fn test_send_error_unregisters() {
        let registry = ChannelRegistry::with_default_timeout();
        let _stream = registry.subscribe(7);

        // Saturate the undrained queue until the channel poisons itself.
        let mut pushed_false = false;
        for i in 0..64 {
            if !registry.push(7, &i.to_string(), NOTIFICATION_EVENT_NAME, &i) {
                pushed_false = true;
                break;
            }
        }
        assert!(pushed_false);
        assert!(!registry.is_connected(7));
    }

    #[tokio::test]
    async fn test_concurrent_subscribes_leave_single_entry() {
        let registry = ChannelRegistry::with_default_timeout();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.subscribe(42) })
            })
            .collect();

        let mut streams = Vec::new();
        for handle in handles {
            streams.push(handle.await.unwrap());
        }

        assert_eq!(registry.connection_count(), 1);
        assert!(registry.is_connected(42));
    }
}
