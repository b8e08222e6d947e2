use axum::{extract::State, response::IntoResponse, routing::get, Router};
use std::sync::Arc;

use crate::{controllers::data, error::ApiError, middleware::CurrentUser, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(get_current_user))
}

// GET /api/v1/users - профиль с баллами и ваучерами
async fn get_current_user(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .store
        .find_user_profile(&user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(data(profile))
}
