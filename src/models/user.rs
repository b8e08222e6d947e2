use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub total_points: i64,
}

// Ваучер пользователя: процентная скидка, уже закрепленная за аккаунтом
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVoucher {
    pub id: String,
    pub user_id: String,
    pub discount: i32,
}

/// Profile returned by `GET /api/v1/users`: the user plus owned vouchers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub vouchers: Vec<UserVoucher>,
}

impl UserProfile {
    pub fn voucher(&self, voucher_id: &str) -> Option<&UserVoucher> {
        self.vouchers.iter().find(|v| v.id == voucher_id)
    }
}
