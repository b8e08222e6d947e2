use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::sync::Arc;

use crate::{
    controllers::data, error::ApiError, middleware::CurrentUser,
    services::checkout::CheckoutRequest, AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(create_booking))
}

// POST /api/v1/bookings
async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let booking = state.checkout.book(&user.user_id, &req).await?;
    Ok((StatusCode::CREATED, data(booking)))
}
