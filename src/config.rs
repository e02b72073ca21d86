use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_MARKET_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/coinfolio.db";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid URL for {name}: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("Unsupported URL scheme for {name}: {scheme}")]
    UnsupportedScheme { name: &'static str, scheme: String },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}

/// Client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub market_base_url: String,
    pub vs_currency: String,
    pub market_per_page: u32, // Coins requested per snapshot (CoinGecko caps at 250)
    pub page_size: usize,     // Rows per market list page
    pub request_timeout_ms: u64,
    pub database_url: String,
    pub backend_sync: bool, // Ask the backend to sync its market table after a refresh
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            market_base_url: DEFAULT_MARKET_BASE_URL.to_string(),
            vs_currency: "usd".to_string(),
            market_per_page: 100,
            page_size: 20,
            request_timeout_ms: 10_000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            backend_sync: true,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Invalid values are logged and the
    /// default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = non_empty(&lookup, "COINFOLIO_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Some(url) = non_empty(&lookup, "COINFOLIO_MARKET_BASE_URL") {
            config.market_base_url = url;
        }
        if let Some(currency) = non_empty(&lookup, "COINFOLIO_VS_CURRENCY") {
            config.vs_currency = currency.to_lowercase();
        }
        if let Some(url) = non_empty(&lookup, "COINFOLIO_DATABASE_URL") {
            config.database_url = url;
        }

        config.market_per_page = parse_in_range(
            &lookup,
            "COINFOLIO_MARKET_PER_PAGE",
            1..=250,
            config.market_per_page,
        );
        config.page_size = parse_in_range(&lookup, "COINFOLIO_PAGE_SIZE", 1..=100, config.page_size);
        config.request_timeout_ms = parse_in_range(
            &lookup,
            "COINFOLIO_REQUEST_TIMEOUT_MS",
            1_000..=60_000,
            config.request_timeout_ms,
        );

        if let Some(raw) = lookup("COINFOLIO_BACKEND_SYNC") {
            match raw.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => config.backend_sync = true,
                "false" | "0" | "no" => config.backend_sync = false,
                _ => {
                    tracing::warn!(
                        "Invalid COINFOLIO_BACKEND_SYNC value: '{}', using default: {}",
                        raw,
                        config.backend_sync
                    );
                }
            }
        }

        config
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Check that both endpoints are usable http(s) URLs
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_http_url("COINFOLIO_API_BASE_URL", &self.api_base_url)?;
        check_http_url("COINFOLIO_MARKET_BASE_URL", &self.market_base_url)?;
        if self.vs_currency.trim().is_empty() {
            return Err(ConfigError::Empty {
                name: "COINFOLIO_VS_CURRENCY",
            });
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Empty {
                name: "COINFOLIO_DATABASE_URL",
            });
        }
        Ok(())
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_in_range<F, T>(lookup: &F, key: &str, range: RangeInclusive<T>, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Display + Copy,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) if range.contains(&value) => value,
        Ok(value) => {
            tracing::warn!(
                "Invalid {} value: {} (must be between {} and {}), using default: {}",
                key,
                value,
                range.start(),
                range.end(),
                default
            );
            default
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse {} '{}': {}, using default: {}",
                key,
                raw,
                e,
                default
            );
            default
        }
    }
}

fn check_http_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::UnsupportedScheme {
            name,
            scheme: other.to_string(),
        }),
    }
}
