pub mod vouchers;
pub mod users;
pub mod showtimes;
pub mod checkout;
pub mod bookings;

use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Success envelope: every endpoint answers `{ "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

pub fn data<T: Serialize>(data: T) -> Json<DataResponse<T>> {
    Json(DataResponse { data })
}

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(vouchers::routes())
        .merge(users::routes())
        .merge(showtimes::routes())
        .merge(checkout::routes())
        .merge(bookings::routes())
}
