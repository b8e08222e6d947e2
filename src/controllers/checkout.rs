use axum::{
    extract::{rejection::JsonRejection, State},
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
        .route("/checkout/quote", post(quote_checkout))
}

// POST /api/v1/checkout/quote - пересчет суммы без записи
async fn quote_checkout(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let quote = state.checkout.quote(&user.user_id, &req).await?;
    Ok(data(quote))
}
