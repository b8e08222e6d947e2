use crate::{redis_client::RedisClient, store::Store};
use std::sync::Arc;
use tracing::info;

pub mod seats;

/// Read-through cache in front of the store. Without Redis every call goes
/// straight to the store.
#[derive(Clone)]
pub struct CacheService {
    redis: Option<RedisClient>,
    store: Arc<dyn Store>,
    seat_ttl_seconds: u64,
}

impl CacheService {
    pub fn new(redis: Option<RedisClient>, store: Arc<dyn Store>, seat_ttl_seconds: u64) -> Self {
        if redis.is_none() {
            info!("Redis not configured, seat cache disabled");
        }
        Self { redis, store, seat_ttl_seconds }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}
