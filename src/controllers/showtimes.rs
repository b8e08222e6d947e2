use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::{controllers::data, error::ApiError, models::SeatMap, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/showtimes/search/seats/{id}", get(get_seat_map))
}

// GET /api/v1/showtimes/search/seats/{id}
async fn get_seat_map(
    State(state): State<Arc<AppState>>,
    Path(showtime_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let showtime = state
        .store
        .find_showtime(&showtime_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Showtime not found"))?;

    let seats = state.cache.get_seats(&showtime.id).await?;

    Ok(data(SeatMap::new(showtime.id, showtime.price, seats)))
}
