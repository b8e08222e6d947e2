use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

use crate::error::ApiError;

/// Header carrying the id of the signed-in user, set by the gateway in front
/// of this service. Session handling itself lives there.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: String,
}

impl FromRequestParts<Arc<crate::AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        Ok(CurrentUser { user_id: user_id.to_string() })
    }
}
