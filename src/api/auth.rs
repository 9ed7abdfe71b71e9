//! Caller identity extraction.
//!
//! Authentication itself is an external collaborator; by the time a request
//! reaches this service the session layer has resolved the caller and put
//! the user id in `X-User-Id`. The extractor only parses it.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

/// The authenticated caller's user id.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(CurrentUser)
            .ok_or(AppError::Unauthenticated)
    }
}
