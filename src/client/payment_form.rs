use crate::models::{AdminVoucher, BookingData, SeatPosition, UserVoucher};
use crate::services::checkout::CheckoutRequest;
use crate::services::pricing::{self, Discounts, Percent, PriceQuote, PricingError};

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentAction {
    SelectPoints(i64),
    RemovePoints,
    SelectVoucher(UserVoucher),
    RemoveVoucher,
    /// User typed into the promo code field.
    TypePromoCode(String),
    /// Result of "check code": the voucher if the API found it.
    PromoCodeChecked(Option<AdminVoucher>),
    /// "Use discount" on a checked promo code.
    UseAdminVoucher,
    RemoveAdminVoucher,
}

/// Checkout form state: points, the user's voucher and the promo code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentForm {
    pub points: Option<i64>,
    pub voucher: Option<UserVoucher>,
    pub admin_voucher_id: String,
    pub checked_admin_voucher: Option<AdminVoucher>,
    pub admin_voucher_discount: Option<i32>,
}

impl PaymentForm {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn apply(self, action: PaymentAction) -> Self {
        match action {
            PaymentAction::SelectPoints(points) => Self { points: Some(points), ..self },
            PaymentAction::RemovePoints => Self { points: None, ..self },
            PaymentAction::SelectVoucher(voucher) => Self { voucher: Some(voucher), ..self },
            PaymentAction::RemoveVoucher => Self { voucher: None, ..self },
            // Новый код сбрасывает результат прошлой проверки
            PaymentAction::TypePromoCode(code) => Self {
                admin_voucher_id: code,
                checked_admin_voucher: None,
                admin_voucher_discount: None,
                ..self
            },
            PaymentAction::PromoCodeChecked(found) => Self { checked_admin_voucher: found, ..self },
            PaymentAction::UseAdminVoucher => {
                let discount = self.checked_admin_voucher.as_ref().map(|v| v.discount);
                Self { admin_voucher_discount: discount, ..self }
            }
            PaymentAction::RemoveAdminVoucher => Self {
                admin_voucher_id: String::new(),
                checked_admin_voucher: None,
                admin_voucher_discount: None,
                ..self
            },
        }
    }

    /// Live total shown under the form.
    pub fn quote(&self, seats: &[BookingData]) -> Result<PriceQuote, PricingError> {
        let discounts = Discounts {
            points: self.points,
            voucher: self.voucher.as_ref().map(|v| Percent::new(v.discount)).transpose()?,
            admin_voucher: self.admin_voucher_discount.map(Percent::new).transpose()?,
        };
        pricing::quote(BookingData::subtotal(seats), &discounts)
    }

    pub fn to_request(&self, showtime_id: &str, seats: &[BookingData]) -> CheckoutRequest {
        CheckoutRequest {
            showtime_id: showtime_id.to_string(),
            seats: seats.iter().map(BookingData::position).collect::<Vec<SeatPosition>>(),
            points: self.points,
            voucher_id: self.voucher.as_ref().map(|v| v.id.clone()),
            admin_voucher_id: self
                .admin_voucher_discount
                .and(self.checked_admin_voucher.as_ref())
                .map(|v| v.id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seats(n: usize, price: f64) -> Vec<BookingData> {
        (1..=n as i32).map(|c| BookingData { row: 1, column: c, price }).collect()
    }

    fn promo(discount: i32) -> AdminVoucher {
        AdminVoucher { id: "NONTON".into(), discount, availability: 5 }
    }

    #[test]
    fn total_updates_on_every_action() {
        let seats = seats(2, 50_000.0);
        let form = PaymentForm::new();
        assert_eq!(form.quote(&seats).unwrap().total_price, 100_000.0);

        let form = form.apply(PaymentAction::SelectPoints(10_000));
        assert_eq!(form.quote(&seats).unwrap().total_price, 90_000.0);

        let form = form.apply(PaymentAction::SelectVoucher(UserVoucher {
            id: "v1".into(),
            user_id: "u1".into(),
            discount: 10,
        }));
        assert_eq!(form.quote(&seats).unwrap().total_price, 81_000.0);

        let form = form
            .apply(PaymentAction::TypePromoCode("NONTON".into()))
            .apply(PaymentAction::PromoCodeChecked(Some(promo(10))))
            .apply(PaymentAction::UseAdminVoucher);
        assert_eq!(form.quote(&seats).unwrap().total_price, 72_900.0);

        let form = form.apply(PaymentAction::RemovePoints);
        assert_eq!(form.quote(&seats).unwrap().total_price, 81_000.0);
    }

    #[test]
    fn checked_code_is_not_applied_until_used() {
        let form = PaymentForm::new()
            .apply(PaymentAction::TypePromoCode("NONTON".into()))
            .apply(PaymentAction::PromoCodeChecked(Some(promo(50))));
        assert_eq!(form.admin_voucher_discount, None);
        assert_eq!(form.to_request("st", &seats(1, 10.0)).admin_voucher_id, None);

        let form = form.apply(PaymentAction::UseAdminVoucher);
        assert_eq!(form.to_request("st", &seats(1, 10.0)).admin_voucher_id, Some("NONTON".into()));
    }

    #[test]
    fn retyping_or_removing_code_drops_discount() {
        let used = PaymentForm::new()
            .apply(PaymentAction::PromoCodeChecked(Some(promo(20))))
            .apply(PaymentAction::UseAdminVoucher);
        assert_eq!(used.admin_voucher_discount, Some(20));

        let retyped = used.clone().apply(PaymentAction::TypePromoCode("OTHER".into()));
        assert_eq!(retyped.admin_voucher_discount, None);

        let removed = used.apply(PaymentAction::RemoveAdminVoucher);
        assert_eq!(removed, PaymentForm::new());
    }

    #[test]
    fn request_carries_positions_and_ids() {
        let form = PaymentForm::new().apply(PaymentAction::SelectPoints(20_000));
        let req = form.to_request("st-9", &seats(2, 40_000.0));
        assert_eq!(req.showtime_id, "st-9");
        assert_eq!(req.seats, vec![SeatPosition { row: 1, column: 1 }, SeatPosition { row: 1, column: 2 }]);
        assert_eq!(req.points, Some(20_000));
        assert_eq!(req.voucher_id, None);
    }
}
