use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Caller identity placed in the request extensions by
/// [`jwt_auth_middleware`](super::jwt_auth_middleware).
///
/// Extracting it on a route without the middleware yields 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub organizer_id: Uuid,
    pub cpf: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
