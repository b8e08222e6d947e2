use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Availability must stay strictly above this for a promo code to be redeemable.
pub const MIN_AVAILABILITY: i32 = 1;

/// Promo code issued by administrators; `id` is the code itself.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AdminVoucher {
    pub id: String,
    pub discount: i32,
    pub availability: i32,
}

impl AdminVoucher {
    pub fn is_redeemable(&self) -> bool {
        self.availability > MIN_AVAILABILITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voucher(availability: i32) -> AdminVoucher {
        AdminVoucher { id: "PROMO".into(), discount: 10, availability }
    }

    #[test]
    fn redeemable_only_above_one() {
        assert!(voucher(2).is_redeemable());
        assert!(voucher(50).is_redeemable());
        assert!(!voucher(1).is_redeemable());
        assert!(!voucher(0).is_redeemable());
    }
}
