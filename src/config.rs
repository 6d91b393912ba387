use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Everything the service needs at runtime, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// When unset the service keeps history in memory only.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub fetch_timeout: Duration,
    pub request_timeout: Duration,
    pub log_filter: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::Config("GEMINI_API_KEY is not set".to_string()))?;

        let gemini_model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let gemini_base_url = lookup("GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5u32)?;

        let fetch_timeout = Duration::from_secs(parse_or(&lookup, "FETCH_TIMEOUT_SECS", 10u64)?);
        let request_timeout = Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 90u64)?);

        // Load server configuration with defaults
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(&lookup, "PORT", 3000u16)?;
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            gemini_api_key,
            gemini_model,
            gemini_base_url,
            database_url,
            database_max_connections,
            fetch_timeout,
            request_timeout,
            log_filter,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let cfg = config_from(&[("GEMINI_API_KEY", "secret")]).unwrap();
        assert_eq!(cfg.server_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(cfg.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.database_max_connections, 5);
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(10));
        assert_eq!(cfg.request_timeout, Duration::from_secs(90));
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = config_from(&[("PORT", "8080")]).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("GEMINI_API_KEY")));
    }

    #[test]
    fn overrides_are_honoured() {
        let cfg = config_from(&[
            ("GEMINI_API_KEY", "secret"),
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("GEMINI_BASE_URL", "http://localhost:1234/"),
            ("DATABASE_URL", "postgres://u:p@db/blogs"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(cfg.server_addr, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.gemini_base_url, "http://localhost:1234");
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://u:p@db/blogs"));
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let err = config_from(&[("GEMINI_API_KEY", "secret"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.starts_with("Invalid PORT")));
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let cfg = config_from(&[("GEMINI_API_KEY", "secret"), ("DATABASE_URL", "  ")]).unwrap();
        assert!(cfg.database_url.is_none());
    }
}
