//! User identity extraction
//!
//! Authentication happens upstream; the gateway forwards the signed-in
//! account as an `X-User-Id` header. Handlers take either [`CurrentUser`]
//! (identity optional) or [`RequiredUser`] (rejects anonymous requests).

use crate::error::ApiError;
use axum::http::{request::Parts, HeaderName};
use fitplan_shared::validation::validate_user_id;

/// Header carrying the signed-in user id
pub static USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// Signed-in user, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub Option<String>);

impl CurrentUser {
    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Signed-in user; anonymous requests are rejected with 401
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredUser {
    pub user_id: String,
}

fn user_from_parts(parts: &Parts) -> Result<Option<String>, ApiError> {
    let Some(value) = parts.headers.get(&USER_ID_HEADER) else {
        return Ok(None);
    };

    let user_id = value
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid user id header".to_string()))?
        .trim();
    if user_id.is_empty() {
        return Ok(None);
    }

    validate_user_id(user_id).map_err(ApiError::Unauthorized)?;
    Ok(Some(user_id.to_string()))
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_from_parts(parts).map(CurrentUser)
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for RequiredUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_from_parts(parts)?
            .map(|user_id| RequiredUser { user_id })
            .ok_or_else(|| ApiError::Unauthorized("Missing user id".to_string()))
    }
}
