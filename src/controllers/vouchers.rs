use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::{controllers::data, error::ApiError, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/vouchers/{id}", get(search_admin_voucher))
}

// GET /api/v1/vouchers/{id}
// Только проверка: availability здесь не уменьшается
async fn search_admin_voucher(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let voucher = state
        .store
        .find_redeemable_admin_voucher(code.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Voucher not found"))?;

    Ok(data(voucher))
}
