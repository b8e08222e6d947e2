use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{
    AdminVoucher, Booking, BookingDraft, Seat, Showtime, User, UserProfile, UserVoucher,
};

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    vouchers: Vec<UserVoucher>,
    admin_vouchers: HashMap<String, AdminVoucher>,
    showtimes: HashMap<String, Showtime>,
    seats: HashMap<String, Vec<Seat>>,
    bookings: Vec<Booking>,
}

/// Process-local store. Every write happens under one lock, so a booking
/// commit is as atomic here as the Postgres transaction.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id.clone(), user);
    }

    pub async fn insert_user_voucher(&self, voucher: UserVoucher) {
        self.inner.write().await.vouchers.push(voucher);
    }

    pub async fn insert_admin_voucher(&self, voucher: AdminVoucher) {
        self.inner.write().await.admin_vouchers.insert(voucher.id.clone(), voucher);
    }

    pub async fn insert_showtime(&self, showtime: Showtime, seats: Vec<Seat>) {
        let mut inner = self.inner.write().await;
        inner.seats.insert(showtime.id.clone(), seats);
        inner.showtimes.insert(showtime.id.clone(), showtime);
    }

    pub async fn admin_voucher(&self, code: &str) -> Option<AdminVoucher> {
        self.inner.read().await.admin_vouchers.get(code).cloned()
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.inner.read().await.bookings.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(user_id).map(|user| UserProfile {
            user: user.clone(),
            vouchers: inner
                .vouchers
                .iter()
                .filter(|v| v.user_id == user_id)
                .cloned()
                .collect(),
        }))
    }

    async fn find_redeemable_admin_voucher(&self, code: &str) -> Result<Option<AdminVoucher>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.admin_vouchers.get(code).filter(|v| v.is_redeemable()).cloned())
    }

    async fn find_showtime(&self, showtime_id: &str) -> Result<Option<Showtime>, StoreError> {
        Ok(self.inner.read().await.showtimes.get(showtime_id).cloned())
    }

    async fn list_seats(&self, showtime_id: &str) -> Result<Vec<Seat>, StoreError> {
        Ok(self.inner.read().await.seats.get(showtime_id).cloned().unwrap_or_default())
    }

    async fn commit_booking(&self, draft: &BookingDraft) -> Result<Booking, StoreError> {
        let mut inner = self.inner.write().await;

        // Сначала все проверки, потом все изменения
        let seats = inner.seats.get(&draft.showtime_id).map(Vec::as_slice).unwrap_or_default();
        for wanted in &draft.seats {
            let free = seats.iter().any(|s| s.position() == *wanted && !s.booked);
            if !free {
                return Err(StoreError::SeatTaken(*wanted));
            }
        }

        let points = draft.quote.points_applied;
        let balance = inner.users.get(&draft.user_id).map_or(0, |u| u.total_points);
        if points > balance {
            return Err(StoreError::InsufficientPoints);
        }

        let voucher_index = match &draft.voucher_id {
            Some(id) => Some(
                inner
                    .vouchers
                    .iter()
                    .position(|v| &v.id == id && v.user_id == draft.user_id)
                    .ok_or_else(|| StoreError::VoucherUnavailable(id.clone()))?,
            ),
            None => None,
        };

        if let Some(code) = &draft.admin_voucher_id {
            let redeemable = inner.admin_vouchers.get(code).is_some_and(|v| v.is_redeemable());
            if !redeemable {
                return Err(StoreError::AdminVoucherUnavailable(code.clone()));
            }
        }

        if let Some(seats) = inner.seats.get_mut(&draft.showtime_id) {
            for seat in seats.iter_mut().filter(|s| draft.seats.contains(&s.position())) {
                seat.booked = true;
            }
        }
        if let Some(user) = inner.users.get_mut(&draft.user_id) {
            user.total_points -= points;
        }
        if let Some(index) = voucher_index {
            inner.vouchers.remove(index);
        }
        if let Some(voucher) = draft
            .admin_voucher_id
            .as_ref()
            .and_then(|code| inner.admin_vouchers.get_mut(code))
        {
            voucher.availability -= 1;
        }

        let booking = Booking::from_draft(draft, Uuid::new_v4(), chrono::Utc::now().naive_utc());
        inner.bookings.push(booking.clone());
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatPosition;
    use crate::services::pricing::{quote, Discounts};

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_user(User {
                id: "u1".into(),
                email: "u1@example.com".into(),
                name: "Ayu".into(),
                total_points: 20_000,
            })
            .await;
        store
            .insert_admin_voucher(AdminVoucher { id: "LAST".into(), discount: 10, availability: 2 })
            .await;
        store
            .insert_showtime(
                Showtime {
                    id: "st".into(),
                    movie_title: "Film".into(),
                    starts_at: chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
                        .unwrap()
                        .and_hms_opt(19, 0, 0)
                        .unwrap(),
                    price: 50_000.0,
                },
                vec![
                    Seat { id: 1, row: 1, column: 1, booked: false },
                    Seat { id: 2, row: 1, column: 2, booked: true },
                ],
            )
            .await;
        store
    }

    fn draft(seats: Vec<SeatPosition>, points: i64, admin: Option<&str>) -> BookingDraft {
        BookingDraft {
            user_id: "u1".into(),
            showtime_id: "st".into(),
            seats,
            voucher_id: None,
            admin_voucher_id: admin.map(String::from),
            quote: quote(50_000.0, &Discounts { points: Some(points), ..Default::default() }).unwrap(),
        }
    }

    #[tokio::test]
    async fn commit_spends_points_and_availability() {
        let store = seeded().await;
        let booking = store
            .commit_booking(&draft(vec![SeatPosition { row: 1, column: 1 }], 10_000, Some("LAST")))
            .await
            .unwrap();

        assert_eq!(booking.total, 40_000.0);
        let profile = store.find_user_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.user.total_points, 10_000);
        assert_eq!(store.admin_voucher("LAST").await.unwrap().availability, 1);
        // availability дошла до 1 - промокод больше не выдается
        assert!(store.find_redeemable_admin_voucher("LAST").await.unwrap().is_none());
        assert!(store.list_seats("st").await.unwrap()[0].booked);
    }

    #[tokio::test]
    async fn booked_seat_fails_without_side_effects() {
        let store = seeded().await;
        let err = store
            .commit_booking(&draft(
                vec![SeatPosition { row: 1, column: 1 }, SeatPosition { row: 1, column: 2 }],
                10_000,
                None,
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::SeatTaken(SeatPosition { row: 1, column: 2 })));
        assert!(!store.list_seats("st").await.unwrap()[0].booked);
        let profile = store.find_user_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.user.total_points, 20_000);
        assert!(store.bookings().await.is_empty());
    }

    async fn assert_untouched(store: &MemoryStore) {
        assert!(!store.list_seats("st").await.unwrap()[0].booked);
        let profile = store.find_user_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.user.total_points, 20_000);
        assert_eq!(profile.vouchers.len(), 1);
        assert!(store.bookings().await.is_empty());
    }

    async fn with_user_voucher() -> MemoryStore {
        let store = seeded().await;
        store
            .insert_user_voucher(UserVoucher { id: "v1".into(), user_id: "u1".into(), discount: 10 })
            .await;
        store
    }

    #[tokio::test]
    async fn points_spent_elsewhere_fail_commit() {
        let store = with_user_voucher().await;
        // баланс 20000, а в черновике 30000
        let err = store
            .commit_booking(&draft(vec![SeatPosition { row: 1, column: 1 }], 30_000, None))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::InsufficientPoints));
        assert_untouched(&store).await;
    }

    #[tokio::test]
    async fn used_up_user_voucher_fails_commit() {
        let store = with_user_voucher().await;
        let mut draft = draft(vec![SeatPosition { row: 1, column: 1 }], 10_000, None);
        draft.voucher_id = Some("v-gone".into());

        let err = store.commit_booking(&draft).await.unwrap_err();

        assert!(matches!(err, StoreError::VoucherUnavailable(ref id) if id == "v-gone"));
        assert_untouched(&store).await;
    }

    #[tokio::test]
    async fn foreign_user_voucher_fails_commit() {
        let store = with_user_voucher().await;
        store
            .insert_user_voucher(UserVoucher { id: "v2".into(), user_id: "u2".into(), discount: 30 })
            .await;
        let mut draft = draft(vec![SeatPosition { row: 1, column: 1 }], 0, None);
        draft.voucher_id = Some("v2".into());

        let err = store.commit_booking(&draft).await.unwrap_err();
        assert!(matches!(err, StoreError::VoucherUnavailable(_)));
        assert_untouched(&store).await;
    }

    #[tokio::test]
    async fn exhausted_promo_code_fails_commit() {
        let store = with_user_voucher().await;
        store
            .insert_admin_voucher(AdminVoucher { id: "LAST".into(), discount: 10, availability: 1 })
            .await;
        let mut draft = draft(vec![SeatPosition { row: 1, column: 1 }], 10_000, Some("LAST"));
        draft.voucher_id = Some("v1".into());

        let err = store.commit_booking(&draft).await.unwrap_err();

        assert!(matches!(err, StoreError::AdminVoucherUnavailable(ref code) if code == "LAST"));
        assert_untouched(&store).await;
        assert_eq!(store.admin_voucher("LAST").await.unwrap().availability, 1);
    }
}
