//! Server-side checkout: re-validates everything the client picked and
//! prices it with [`pricing::quote`] before anything is written.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;
use validator::Validate;

use crate::cache::CacheService;
use crate::error::ApiError;
use crate::models::{AdminVoucher, Booking, BookingData, BookingDraft, SeatPosition, UserVoucher};
use crate::services::pricing::{self, Discounts, Percent, PriceQuote, POINT_STEP};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "showtimeId is required"))]
    pub showtime_id: String,
    #[validate(length(min = 1, message = "select at least one seat"))]
    pub seats: Vec<SeatPosition>,
    #[serde(default)]
    #[validate(range(min = 0, message = "points must not be negative"))]
    pub points: Option<i64>,
    #[serde(default)]
    pub voucher_id: Option<String>,
    #[serde(default)]
    pub admin_voucher_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutQuote {
    pub showtime_id: String,
    pub seats: Vec<BookingData>,
    pub point_options: Vec<i64>,
    pub voucher: Option<UserVoucher>,
    pub admin_voucher: Option<AdminVoucher>,
    pub quote: PriceQuote,
}

#[derive(Clone)]
pub struct CheckoutService {
    cache: CacheService,
}

// Пустой промокод с фронта приходит как "" или "-"
fn normalize_code(code: &Option<String>) -> Option<String> {
    code.as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != "-")
        .map(String::from)
}

impl CheckoutService {
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    pub async fn quote(&self, user_id: &str, req: &CheckoutRequest) -> Result<CheckoutQuote, ApiError> {
        let (quote, _) = self.prepare(user_id, req).await?;
        Ok(quote)
    }

    pub async fn book(&self, user_id: &str, req: &CheckoutRequest) -> Result<Booking, ApiError> {
        let (_, draft) = self.prepare(user_id, req).await?;
        let booking = self.cache.store().commit_booking(&draft).await?;
        self.cache.invalidate_seats(&draft.showtime_id).await;

        info!(
            "Booking {} created: user={} showtime={} seats={} total={}",
            booking.id,
            booking.user_id,
            booking.showtime_id,
            booking.seats.len(),
            booking.total
        );
        Ok(booking)
    }

    async fn prepare(
        &self,
        user_id: &str,
        req: &CheckoutRequest,
    ) -> Result<(CheckoutQuote, BookingDraft), ApiError> {
        req.validate()?;

        let mut seen = HashSet::new();
        if let Some(dup) = req.seats.iter().find(|s| !seen.insert(**s)) {
            return Err(ApiError::invalid(
                "seats",
                format!("seat {}.{} selected twice", dup.row, dup.column),
            ));
        }

        let store = self.cache.store();
        let (profile, showtime, seats) = futures::try_join!(
            store.find_user_profile(user_id),
            store.find_showtime(&req.showtime_id),
            store.list_seats(&req.showtime_id),
        )?;
        let profile = profile.ok_or_else(|| ApiError::not_found("User not found"))?;
        let showtime = showtime.ok_or_else(|| ApiError::not_found("Showtime not found"))?;

        // 1. Места должны существовать и быть свободны
        let mut booking_data = Vec::with_capacity(req.seats.len());
        for wanted in &req.seats {
            let seat = seats.iter().find(|s| s.position() == *wanted).ok_or_else(|| {
                ApiError::invalid(
                    "seats",
                    format!("seat {}.{} does not exist", wanted.row, wanted.column),
                )
            })?;
            if seat.booked {
                return Err(ApiError::Conflict(format!(
                    "seat {}.{} is already booked",
                    wanted.row, wanted.column
                )));
            }
            booking_data.push(BookingData { row: seat.row, column: seat.column, price: showtime.price });
        }
        let subtotal = BookingData::subtotal(&booking_data);

        // 2. Баллы: не больше баланса и шагами по POINT_STEP
        let balance = profile.user.total_points;
        let points = req.points.filter(|p| *p > 0);
        if let Some(points) = points {
            if points > balance {
                return Err(ApiError::invalid("points", "points exceed your balance"));
            }
            if points % POINT_STEP != 0 {
                return Err(ApiError::invalid(
                    "points",
                    format!("points must be a multiple of {}", POINT_STEP),
                ));
            }
        }

        // 3. Ваучер должен принадлежать пользователю
        let voucher = match normalize_code(&req.voucher_id) {
            Some(id) => Some(
                profile
                    .voucher(&id)
                    .cloned()
                    .ok_or_else(|| ApiError::invalid("voucherId", "Voucher not found"))?,
            ),
            None => None,
        };

        // 4. Промокод должен быть доступен
        let admin_voucher = match normalize_code(&req.admin_voucher_id) {
            Some(code) => Some(
                store
                    .find_redeemable_admin_voucher(&code)
                    .await?
                    .ok_or_else(|| ApiError::invalid("adminVoucherId", "Voucher not found"))?,
            ),
            None => None,
        };

        let discounts = Discounts {
            points,
            voucher: voucher.as_ref().map(|v| Percent::new(v.discount)).transpose()?,
            admin_voucher: admin_voucher.as_ref().map(|v| Percent::new(v.discount)).transpose()?,
        };
        let quote = pricing::quote(subtotal, &discounts)?;

        let draft = BookingDraft {
            user_id: profile.user.id.clone(),
            showtime_id: showtime.id.clone(),
            seats: req.seats.clone(),
            voucher_id: voucher.as_ref().map(|v| v.id.clone()),
            admin_voucher_id: admin_voucher.as_ref().map(|v| v.id.clone()),
            quote: quote.clone(),
        };
        let checkout = CheckoutQuote {
            showtime_id: showtime.id,
            seats: booking_data,
            point_options: pricing::point_options(balance, subtotal),
            voucher,
            admin_voucher,
            quote,
        };
        Ok((checkout, draft))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_promo_codes_are_ignored() {
        assert_eq!(normalize_code(&Some("-".into())), None);
        assert_eq!(normalize_code(&Some("  ".into())), None);
        assert_eq!(normalize_code(&None), None);
        assert_eq!(normalize_code(&Some(" NONTON10 ".into())), Some("NONTON10".into()));
    }

    #[test]
    fn request_accepts_camel_case_and_missing_discounts() {
        let req: CheckoutRequest = serde_json::from_str(
            r#"{"showtimeId":"st-1","seats":[{"row":1,"column":2}]}"#,
        )
        .unwrap();
        assert_eq!(req.points, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn request_without_seats_fails_validation() {
        let req = CheckoutRequest {
            showtime_id: "st-1".into(),
            seats: vec![],
            points: Some(-1),
            voucher_id: None,
            admin_voucher_id: None,
        };
        let err: ApiError = req.validate().unwrap_err().into();
        match err {
            ApiError::Validation(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["points", "seats"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
