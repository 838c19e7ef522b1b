//! Runtime configuration loaded from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::api::nse::DEFAULT_BASE_URL;
use crate::error::ConfigError;
use crate::models::cache::CacheConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub nse_base_url: String,
    pub upstream_timeout: Duration,
    pub cache: CacheConfig,
    /// How often the server drops expired cache entries
    pub sweep_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            nse_base_url: DEFAULT_BASE_URL.into(),
            upstream_timeout: Duration::from_secs(10),
            cache: CacheConfig::default(),
            sweep_interval: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache = CacheConfig {
            capacity: parse(&lookup, "CACHE_CAPACITY", defaults.cache.capacity)?,
            ttl_seconds: parse(&lookup, "CACHE_TTL_SECS", defaults.cache.ttl_seconds)?,
        };
        if cache.capacity == 0 {
            return Err(invalid("CACHE_CAPACITY", "0", "must be at least 1"));
        }
        if cache.ttl_seconds == 0 {
            return Err(invalid("CACHE_TTL_SECS", "0", "must be at least 1"));
        }

        let sweep_secs: u64 =
            parse(&lookup, "CACHE_SWEEP_SECS", defaults.sweep_interval.as_secs())?;
        if sweep_secs == 0 {
            return Err(invalid("CACHE_SWEEP_SECS", "0", "must be at least 1"));
        }

        let timeout_secs: u64 = parse(
            &lookup,
            "UPSTREAM_TIMEOUT_SECS",
            defaults.upstream_timeout.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(invalid("UPSTREAM_TIMEOUT_SECS", "0", "must be at least 1"));
        }

        Ok(Self {
            bind_addr: parse(&lookup, "BIND_ADDR", defaults.bind_addr)?,
            nse_base_url: lookup("NSE_BASE_URL").unwrap_or(defaults.nse_base_url),
            upstream_timeout: Duration::from_secs(timeout_secs),
            cache,
            sweep_interval: Duration::from_secs(sweep_secs),
        })
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, &value, &e.to_string())),
        None => Ok(default),
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
