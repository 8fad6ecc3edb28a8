//! Error types for the moim backend.

use thiserror::Error;

/// Result type alias using moim's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for moim operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Notification not found
    #[error("Notification not found: {0}")]
    NotificationNotFound(i64),

    /// Caller does not own the notification (authorization, not existence)
    #[error("Notification {notification_id} does not belong to user {user_id}")]
    NotOwner { notification_id: i64, user_id: i64 },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("crew 7".to_string());
        assert_eq!(err.to_string(), "Not found: crew 7");
    }

    #[test]
    fn test_error_display_notification_not_found() {
        let err = Error::NotificationNotFound(42);
        assert_eq!(err.to_string(), "Notification not found: 42");
    }

    #[test]
    fn test_error_display_not_owner() {
        let err = Error::NotOwner {
            notification_id: 3,
            user_id: 9,
        };
        assert_eq!(
            err.to_string(),
            "Notification 3 does not belong to user 9"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(get_result().unwrap(), 42);
    }
}
