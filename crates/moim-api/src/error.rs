//! HTTP error mapping for API handlers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// API error type mapped onto HTTP status codes.
#[derive(Debug)]
pub enum ApiError {
    Internal(moim_core::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
}

impl From<moim_core::Error> for ApiError {
    fn from(err: moim_core::Error) -> Self {
        match &err {
            moim_core::Error::NotOwner { .. } => ApiError::Forbidden(err.to_string()),
            moim_core::Error::NotificationNotFound(_) | moim_core::Error::NotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            moim_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            _ => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_owner_maps_to_forbidden() {
        let err = ApiError::from(moim_core::Error::NotOwner {
            notification_id: 1,
            user_id: 2,
        });
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_missing_notification_maps_to_not_found() {
        let err = ApiError::from(moim_core::Error::NotificationNotFound(1));
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_other_errors_map_to_internal() {
        let err = ApiError::from(moim_core::Error::Internal("boom".to_string()));
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
