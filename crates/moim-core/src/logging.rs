//! Structured logging field name constants for the moim backend.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "api", "db", "notify"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "registry", "channel", "publisher", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "subscribe", "push", "save", "mark_all_read"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// User the operation is scoped to.
pub const USER_ID: &str = "user_id";

/// Notification record being operated on.
pub const NOTIFICATION_ID: &str = "notification_id";

/// Notification type enum variant.
pub const NOTIFICATION_TYPE: &str = "notification_type";

/// Push channel identity (one per open subscription).
pub const CHANNEL_ID: &str = "channel_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of open push channels in the registry.
pub const CONNECTION_COUNT: &str = "connection_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";
