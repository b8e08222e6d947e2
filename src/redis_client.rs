use redis::{aio::ConnectionManager, Client};
use tracing::info;

/// Redis handle for the seat cache. `ConnectionManager` reconnects on its
/// own, so a Redis restart does not need an API restart.
#[derive(Clone)]
pub struct RedisClient {
    pub conn: ConnectionManager,
}

impl RedisClient {
    // Подключаемся и сразу делаем PING, чтобы упасть на старте, а не на первом запросе
    pub async fn connect(redis_url: &str) -> redis::RedisResult<Self> {
        let client = Client::open(redis_url)?;
        let mut conn = client.get_connection_manager().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        info!("Redis connected");
        Ok(RedisClient { conn })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_url_is_rejected_before_connecting() {
        assert!(RedisClient::connect("not a redis url").await.is_err());
    }
}
