//! Authenticated-principal extraction.
//!
//! Authentication itself lives in front of this service; by the time a
//! request arrives here the gateway has validated the session and stamped
//! the caller's identity into the `X-User-Id` header. This extractor is the
//! only place that header is read.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;

/// Header carrying the already-authenticated user identity.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller of the current request.
pub struct CurrentUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("missing X-User-Id header".to_string()))?;

        let user_id = header
            .to_str()
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| ApiError::Unauthorized("malformed X-User-Id header".to_string()))?;

        Ok(CurrentUser(user_id))
    }
}
