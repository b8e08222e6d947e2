//! Persistence seam.
//!
//! Handlers talk to a [`Store`]; Postgres backs it in production and an
//! in-memory map backs it in tests and when no `DATABASE_URL` is set.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AdminVoucher, Booking, BookingDraft, Seat, SeatPosition, Showtime, UserProfile};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("seat {}.{} is no longer available", .0.row, .0.column)]
    SeatTaken(SeatPosition),
    #[error("not enough points")]
    InsufficientPoints,
    #[error("voucher {0} is no longer available")]
    VoucherUnavailable(String),
    #[error("promo code {0} is no longer available")]
    AdminVoucherUnavailable(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Only returns the voucher while its availability is above one.
    async fn find_redeemable_admin_voucher(&self, code: &str) -> Result<Option<AdminVoucher>, StoreError>;

    async fn find_showtime(&self, showtime_id: &str) -> Result<Option<Showtime>, StoreError>;

    async fn list_seats(&self, showtime_id: &str) -> Result<Vec<Seat>, StoreError>;

    /// Books the seats, spends points and vouchers and records the booking,
    /// all or nothing.
    async fn commit_booking(&self, draft: &BookingDraft) -> Result<Booking, StoreError>;
}
