use serde::Deserialize;
use std::env;
use thiserror::Error;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub cors: CorsConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

// Настройки базы данных. Без DATABASE_URL работаем на in-memory хранилище
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub pool_size: u32,
    pub acquire_timeout_seconds: u64,
}

// Настройки Redis. Без REDIS_URL кеш мест выключен
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: Option<String>,
    pub seat_cache_ttl_seconds: u64,
}

// Откуда фронтенд ходит к API (запросы идут с credentials)
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub client_origin: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: AppConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                environment: "development".to_string(),
                rust_log: "cinema_booking=debug,tower_http=debug".to_string(),
                log_format: LogFormat::Pretty,
            },
            database: DatabaseConfig {
                url: None,
                pool_size: 20,
                acquire_timeout_seconds: 5,
            },
            redis: RedisConfig {
                url: None,
                seat_cache_ttl_seconds: 60,
            },
            cors: CorsConfig {
                client_origin: "http://localhost:3000".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or(defaults.app.host),
                port: parse_var("PORT", "port number", defaults.app.port)?,
                environment: env::var("ENVIRONMENT").unwrap_or(defaults.app.environment),
                rust_log: env::var("RUST_LOG").unwrap_or(defaults.app.rust_log),
                log_format: match env::var("LOG_FORMAT").ok().as_deref() {
                    None | Some("pretty") => LogFormat::Pretty,
                    Some("json") => LogFormat::Json,
                    Some(other) => {
                        return Err(ConfigError::Invalid {
                            name: "LOG_FORMAT",
                            expected: "log format (pretty|json)",
                            value: other.to_string(),
                        })
                    }
                },
            },
            database: DatabaseConfig {
                url: non_empty_var("DATABASE_URL"),
                pool_size: parse_var("DB_POOL_SIZE", "number", defaults.database.pool_size)?,
                acquire_timeout_seconds: parse_var(
                    "DB_ACQUIRE_TIMEOUT_SECONDS",
                    "number",
                    defaults.database.acquire_timeout_seconds,
                )?,
            },
            redis: RedisConfig {
                url: non_empty_var("REDIS_URL"),
                seat_cache_ttl_seconds: parse_var(
                    "SEAT_CACHE_TTL_SECONDS",
                    "number",
                    defaults.redis.seat_cache_ttl_seconds,
                )?,
            },
            cors: CorsConfig {
                client_origin: env::var("CLIENT_ORIGIN").unwrap_or(defaults.cors.client_origin),
            },
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_without_external_services() {
        let config = Config::default();
        assert!(config.database.url.is_none());
        assert!(config.redis.url.is_none());
        assert_eq!(config.app.port, 8000);
        assert_eq!(config.app.log_format, LogFormat::Pretty);
    }

    #[test]
    fn parse_var_reports_bad_values() {
        env::set_var("CINEMA_TEST_BAD_PORT", "eighty");
        let err = parse_var::<u16>("CINEMA_TEST_BAD_PORT", "port number", 1).unwrap_err();
        assert!(err.to_string().contains("CINEMA_TEST_BAD_PORT"));
        env::remove_var("CINEMA_TEST_BAD_PORT");

        assert_eq!(parse_var::<u16>("CINEMA_TEST_UNSET_PORT", "port number", 7).unwrap(), 7);
    }
}
