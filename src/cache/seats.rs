use crate::cache::CacheService;
use crate::models::Seat;
use crate::store::StoreError;
use redis::AsyncCommands;
use tracing::{debug, warn};

fn seats_key(showtime_id: &str) -> String {
    format!("seats:{}", showtime_id)
}

impl CacheService {
    // Получить места сеанса: сначала Redis, потом хранилище
    pub async fn get_seats(&self, showtime_id: &str) -> Result<Vec<Seat>, StoreError> {
        if let Some(seats) = self.get_seats_from_cache(showtime_id).await {
            debug!("Seat cache hit for showtime {}", showtime_id);
            return Ok(seats);
        }

        let seats = self.store.list_seats(showtime_id).await?;
        self.save_seats_to_cache(showtime_id, &seats).await;
        Ok(seats)
    }

    // Инвалидировать кеш мест после бронирования
    pub async fn invalidate_seats(&self, showtime_id: &str) {
        let Some(redis) = &self.redis else { return };
        let mut conn = redis.conn.clone();
        let result: Result<(), _> = conn.del(seats_key(showtime_id)).await;
        match result {
            Ok(()) => debug!("Invalidated seats cache for showtime {}", showtime_id),
            Err(e) => warn!("Failed to invalidate seats cache for showtime {}: {:?}", showtime_id, e),
        }
    }

    // === Работа с кешем ===
    // Ошибки Redis не роняют запрос: при любой проблеме идем в хранилище

    async fn get_seats_from_cache(&self, showtime_id: &str) -> Option<Vec<Seat>> {
        let redis = self.redis.as_ref()?;
        let mut conn = redis.conn.clone();
        let data: Option<String> = match conn.get(seats_key(showtime_id)).await {
            Ok(data) => data,
            Err(e) => {
                warn!("Seat cache read failed: {:?}", e);
                return None;
            }
        };
        data.and_then(|json| serde_json::from_str(&json).ok())
    }

    async fn save_seats_to_cache(&self, showtime_id: &str, seats: &[Seat]) {
        let Some(redis) = &self.redis else { return };
        let Ok(data) = serde_json::to_string(seats) else { return };
        let mut conn = redis.conn.clone();
        let result: Result<(), _> = conn.set_ex(seats_key(showtime_id), data, self.seat_ttl_seconds).await;
        if let Err(e) = result {
            warn!("Seat cache write failed: {:?}", e);
        }
    }
}
