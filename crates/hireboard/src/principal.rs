use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::ids::UserId;

/// Header carrying the id of the caller authenticated upstream.
pub const PRINCIPAL_HEADER: &str = "x-user-id";

/// Authenticated caller as resolved by the gateway in front of this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
}

impl Principal {
    pub fn new(id: u64) -> Self {
        Self { id: UserId(id) }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ErrorCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Principal::new)
            .ok_or(ErrorCode::UnauthorizedUser)
    }
}
