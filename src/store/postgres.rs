use async_trait::async_trait;
use sqlx::Row;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Store, StoreError};
use crate::database::Database;
use crate::models::{
    AdminVoucher, Booking, BookingDraft, Seat, SeatPosition, Showtime, User, UserProfile, UserVoucher,
};

#[derive(Clone)]
pub struct PgStore {
    db: Database,
}

impl PgStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, total_points FROM users WHERE id = $1"
        )
        .bind(user_id)
        .fetch_optional(&self.db.pool)
        .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        let vouchers = sqlx::query_as::<_, UserVoucher>(
            "SELECT id, user_id, discount FROM vouchers WHERE user_id = $1 ORDER BY discount DESC, id"
        )
        .bind(user_id)
        .fetch_all(&self.db.pool)
        .await?;

        Ok(Some(UserProfile { user, vouchers }))
    }

    async fn find_redeemable_admin_voucher(&self, code: &str) -> Result<Option<AdminVoucher>, StoreError> {
        let voucher = sqlx::query_as::<_, AdminVoucher>(
            "SELECT id, discount, availability FROM admin_vouchers WHERE id = $1 AND availability > 1"
        )
        .bind(code)
        .fetch_optional(&self.db.pool)
        .await?;
        Ok(voucher)
    }

    async fn find_showtime(&self, showtime_id: &str) -> Result<Option<Showtime>, StoreError> {
        let showtime = sqlx::query_as::<_, Showtime>(
            "SELECT id, movie_title, starts_at, price FROM showtimes WHERE id = $1"
        )
        .bind(showtime_id)
        .fetch_optional(&self.db.pool)
        .await?;
        Ok(showtime)
    }

    async fn list_seats(&self, showtime_id: &str) -> Result<Vec<Seat>, StoreError> {
        let seats = sqlx::query_as::<_, Seat>(
            r#"SELECT id, row, "column", booked FROM seats WHERE showtime_id = $1 ORDER BY id"#
        )
        .bind(showtime_id)
        .fetch_all(&self.db.pool)
        .await?;
        Ok(seats)
    }

    async fn commit_booking(&self, draft: &BookingDraft) -> Result<Booking, StoreError> {
        let booking_id = Uuid::new_v4();
        let rows: Vec<i32> = draft.seats.iter().map(|s| s.row).collect();
        let columns: Vec<i32> = draft.seats.iter().map(|s| s.column).collect();

        // Любая ошибка ниже дропает транзакцию, и Postgres её откатывает
        let mut tx = self.db.pool.begin().await?;

        // 1) Занимаем только свободные места
        let taken = sqlx::query(
            r#"
            UPDATE seats
            SET booked = TRUE, booking_id = $1
            WHERE showtime_id = $2
              AND booked = FALSE
              AND (row, "column") IN (SELECT * FROM UNNEST($3::int4[], $4::int4[]))
            RETURNING row, "column"
            "#
        )
        .bind(booking_id)
        .bind(&draft.showtime_id)
        .bind(&rows)
        .bind(&columns)
        .fetch_all(&mut *tx)
        .await?;

        let taken: Vec<SeatPosition> = taken
            .iter()
            .map(|r| SeatPosition { row: r.get("row"), column: r.get("column") })
            .collect();
        if let Some(missing) = draft.seats.iter().find(|s| !taken.contains(s)) {
            warn!("Seat {}.{} of showtime {} already booked", missing.row, missing.column, draft.showtime_id);
            return Err(StoreError::SeatTaken(*missing));
        }

        // 2) Списываем баллы
        let points = draft.quote.points_applied;
        if points > 0 {
            let updated = sqlx::query(
                "UPDATE users SET total_points = total_points - $1 WHERE id = $2 AND total_points >= $1"
            )
            .bind(points)
            .bind(&draft.user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
            if updated == 0 {
                return Err(StoreError::InsufficientPoints);
            }
        }

        // 3) Ваучер пользователя одноразовый
        if let Some(voucher_id) = &draft.voucher_id {
            let deleted = sqlx::query("DELETE FROM vouchers WHERE id = $1 AND user_id = $2")
                .bind(voucher_id)
                .bind(&draft.user_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            if deleted == 0 {
                return Err(StoreError::VoucherUnavailable(voucher_id.clone()));
            }
        }

        // 4) Промокод: уменьшаем счетчик, пока он больше 1
        if let Some(code) = &draft.admin_voucher_id {
            let updated = sqlx::query(
                "UPDATE admin_vouchers SET availability = availability - 1 WHERE id = $1 AND availability > 1"
            )
            .bind(code)
            .execute(&mut *tx)
            .await?
            .rows_affected();
            if updated == 0 {
                return Err(StoreError::AdminVoucherUnavailable(code.clone()));
            }
        }

        // 5) Сама бронь
        let created_at: chrono::NaiveDateTime = sqlx::query_scalar(
            r#"
            INSERT INTO bookings
                (id, user_id, showtime_id, subtotal, points_used, voucher_id, admin_voucher_id, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING created_at
            "#
        )
        .bind(booking_id)
        .bind(&draft.user_id)
        .bind(&draft.showtime_id)
        .bind(draft.quote.initial_price)
        .bind(points)
        .bind(&draft.voucher_id)
        .bind(&draft.admin_voucher_id)
        .bind(draft.quote.total_price)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!("Booking {} committed for user {}", booking_id, draft.user_id);

        Ok(Booking::from_draft(draft, booking_id, created_at))
    }
}
