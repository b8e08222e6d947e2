pub mod config;
pub mod database;
pub mod redis_client;
pub mod models;
pub mod store;
pub mod cache;
pub mod services;
pub mod controllers;
pub mod middleware;
pub mod error;
pub mod client;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{
    cache::CacheService,
    config::Config,
    database::Database,
    redis_client::RedisClient,
    services::checkout::CheckoutService,
    store::{MemoryStore, PgStore, Store},
};

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub cache: CacheService,
    pub checkout: CheckoutService,
    pub config: Config,
}

impl AppState {
    /// Wires state around an already built store, without Redis.
    pub fn with_store(store: Arc<dyn Store>, config: Config) -> Arc<Self> {
        Self::assemble(store, None, config)
    }

    pub async fn connect(config: Config) -> anyhow::Result<Arc<Self>> {
        let store: Arc<dyn Store> = match &config.database.url {
            Some(url) => {
                let db = Database::connect(url, &config.database).await?;
                info!("Database connected");
                db.run_migrations().await?;
                Arc::new(PgStore::new(db))
            }
            None => {
                warn!("DATABASE_URL not set, using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        let redis = match &config.redis.url {
            Some(url) => {
                Some(RedisClient::connect(url).await?)
            }
            None => None,
        };

        Ok(Self::assemble(store, redis, config))
    }

    fn assemble(store: Arc<dyn Store>, redis: Option<RedisClient>, config: Config) -> Arc<Self> {
        let cache = CacheService::new(redis, store.clone(), config.redis.seat_cache_ttl_seconds);
        let checkout = CheckoutService::new(cache.clone());
        Arc::new(Self { store, cache, checkout, config })
    }
}

/// Full HTTP application: banner, health check and the `/api/v1` routes.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Cinema Booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api/v1", controllers::routes())
        .with_state(state.clone())
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
}

// Фронтенд ходит с credentials: "include", поэтому origin задается явно
fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(middleware::USER_ID_HEADER),
        ])
        .allow_credentials(true);

    match HeaderValue::from_str(&config.cors.client_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!("CLIENT_ORIGIN {:?} is not a valid header value, CORS disabled", config.cors.client_origin);
            layer
        }
    }
}
