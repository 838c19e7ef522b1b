//! Error types for the quote service.

use thiserror::Error;

/// Failure talking to the market-data provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Request to market data provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Market data provider returned HTTP {0}")]
    Status(u16),

    #[error("Market data provider rate limit reached, try again later")]
    RateLimited,

    #[error("Could not decode market data response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure resolving a quote for a symbol.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("Invalid NSE symbol: {0}")]
    UnknownSymbol(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
