//! Checkout price calculation.
//!
//! Discounts compound in a fixed order: loyalty points are subtracted from
//! the subtotal first, the user's voucher percentage applies to what is
//! left, and the admin voucher (promo code) percentage applies last.
//! A zero amount is treated the same as an absent one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Loyalty points are spent in steps of this size.
pub const POINT_STEP: i64 = 10_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("price must be a non-negative amount, got {0}")]
    InvalidPrice(f64),
    #[error("discount must be between 0 and 100 percent, got {0}")]
    PercentOutOfRange(i32),
    #[error("points must not be negative, got {0}")]
    NegativePoints(i64),
    #[error("points ({points}) exceed the booking subtotal ({subtotal})")]
    PointsExceedSubtotal { points: i64, subtotal: f64 },
}

/// Discount percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Percent(u8);

impl Percent {
    pub fn new(value: i32) -> Result<Self, PricingError> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= 100)
            .map(Percent)
            .ok_or(PricingError::PercentOutOfRange(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    fn of(self, amount: f64) -> f64 {
        amount * f64::from(self.0) / 100.0
    }
}

impl TryFrom<i32> for Percent {
    type Error = PricingError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Percent::new(value)
    }
}

impl From<Percent> for i32 {
    fn from(p: Percent) -> Self {
        i32::from(p.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Discounts {
    pub points: Option<i64>,
    pub voucher: Option<Percent>,
    pub admin_voucher: Option<Percent>,
}

/// Step-by-step breakdown of a checkout total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub initial_price: f64,
    pub points_applied: i64,
    pub after_points: f64,
    pub voucher_discount: f64,
    pub after_voucher: f64,
    pub admin_voucher_discount: f64,
    pub total_price: f64,
    pub saved: f64,
}

impl PriceQuote {
    pub fn has_discount(&self) -> bool {
        self.saved > 0.0
    }
}

pub fn quote(initial_price: f64, discounts: &Discounts) -> Result<PriceQuote, PricingError> {
    if !initial_price.is_finite() || initial_price < 0.0 {
        return Err(PricingError::InvalidPrice(initial_price));
    }

    let points = discounts.points.filter(|p| *p != 0).unwrap_or(0);
    if points < 0 {
        return Err(PricingError::NegativePoints(points));
    }
    if points as f64 > initial_price {
        return Err(PricingError::PointsExceedSubtotal { points, subtotal: initial_price });
    }

    // 1. баллы
    let after_points = initial_price - points as f64;

    // 2. ваучер пользователя от остатка
    let voucher_discount = discounts
        .voucher
        .filter(|p| p.value() != 0)
        .map_or(0.0, |p| p.of(after_points));
    let after_voucher = after_points - voucher_discount;

    // 3. промокод от результата шага 2
    let admin_voucher_discount = discounts
        .admin_voucher
        .filter(|p| p.value() != 0)
        .map_or(0.0, |p| p.of(after_voucher));
    let total_price = (after_voucher - admin_voucher_discount).max(0.0);

    Ok(PriceQuote {
        initial_price,
        points_applied: points,
        after_points,
        voucher_discount,
        after_voucher,
        admin_voucher_discount,
        total_price,
        saved: initial_price - total_price,
    })
}

/// Point amounts a user may choose: multiples of [`POINT_STEP`] up to
/// the smaller of their balance and the subtotal.
pub fn point_options(balance: i64, subtotal: f64) -> Vec<i64> {
    let cap = balance.min(subtotal.max(0.0).floor() as i64);
    (1..=cap / POINT_STEP).map(|i| i * POINT_STEP).collect()
}
