use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SeatPosition;
use crate::services::pricing::PriceQuote;

/// One selected seat with its price, as carried in the checkout `data` query parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingData {
    pub row: i32,
    pub column: i32,
    pub price: f64,
}

impl BookingData {
    pub fn position(&self) -> SeatPosition {
        SeatPosition { row: self.row, column: self.column }
    }

    pub fn subtotal(items: &[BookingData]) -> f64 {
        items.iter().map(|b| b.price).sum()
    }
}

// Всё, что нужно хранилищу, чтобы атомарно записать бронь
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub user_id: String,
    pub showtime_id: String,
    pub seats: Vec<SeatPosition>,
    pub voucher_id: Option<String>,
    pub admin_voucher_id: Option<String>,
    pub quote: PriceQuote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: String,
    pub showtime_id: String,
    pub seats: Vec<SeatPosition>,
    pub subtotal: f64,
    pub points_used: i64,
    pub voucher_id: Option<String>,
    pub admin_voucher_id: Option<String>,
    pub total: f64,
    pub created_at: NaiveDateTime,
}

impl Booking {
    pub fn from_draft(draft: &BookingDraft, id: Uuid, created_at: NaiveDateTime) -> Self {
        Booking {
            id,
            user_id: draft.user_id.clone(),
            showtime_id: draft.showtime_id.clone(),
            seats: draft.seats.clone(),
            subtotal: draft.quote.initial_price,
            points_used: draft.quote.points_applied,
            voucher_id: draft.voucher_id.clone(),
            admin_voucher_id: draft.admin_voucher_id.clone(),
            total: draft.quote.total_price,
            created_at,
        }
    }
}
