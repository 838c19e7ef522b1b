use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::QuoteSource;
use crate::error::QuoteError;
use crate::models::cache::{normalize_key, QuoteCache};
use crate::models::quote::Quote;

const MAX_SYMBOL_LEN: usize = 20;

/// Resolves quotes through the cache, falling back to the upstream source.
pub struct QuoteService {
    source: Arc<dyn QuoteSource>,
    cache: Arc<QuoteCache>,
}

impl QuoteService {
    pub fn new(source: Arc<dyn QuoteSource>, cache: Arc<QuoteCache>) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &Arc<QuoteCache> {
        &self.cache
    }

    pub async fn get_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let symbol = normalize_symbol(symbol)?;

        if let Some(quote) = self.cache.get(&symbol) {
            debug!("Cache hit for {}", symbol);
            return Ok(quote);
        }

        debug!("Cache miss for {}", symbol);
        let raw = self.source.fetch_raw_quote(&symbol).await.map_err(|e| {
            warn!(symbol = %symbol, error = %e, "Upstream fetch failed");
            e
        })?;

        if raw.is_empty() {
            return Err(QuoteError::UnknownSymbol(symbol));
        }

        let quote = Quote::from_raw(&symbol, &raw);
        self.cache.put(&symbol, quote.clone());
        info!(symbol = %symbol, price = ?quote.latest_price, "Fetched quote");
        Ok(quote)
    }
}

/// Uppercases `symbol` and checks it looks like an NSE ticker.
pub fn normalize_symbol(symbol: &str) -> Result<String, QuoteError> {
    let normalized = normalize_key(symbol.trim());
    let valid = !normalized.is_empty()
        && normalized.len() <= MAX_SYMBOL_LEN
        && normalized.chars().all(|c| {
            c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '&' | '-' | '_' | '.')
        });

    if valid {
        Ok(normalized)
    } else {
        Err(QuoteError::InvalidSymbol(symbol.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::UpstreamError;
    use crate::models::quote::{RawInfo, RawPriceInfo, RawQuote};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory source that knows a fixed set of symbols.
    pub(crate) struct StubSource {
        known: Vec<&'static str>,
        fail: bool,
        pub(crate) calls: AtomicUsize,
    }

    impl StubSource {
        pub(crate) fn new(known: Vec<&'static str>) -> Self {
            Self {
                known,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                known: Vec::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl QuoteSource for StubSource {
        async fn fetch_raw_quote(&self, symbol: &str) -> Result<RawQuote, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(UpstreamError::Status(503));
            }
            if !self.known.contains(&symbol) {
                return Ok(RawQuote::default());
            }
            Ok(RawQuote {
                info: Some(RawInfo {
                    symbol: Some(symbol.to_string()),
                    company_name: Some(format!("{} Limited", symbol)),
                }),
                price_info: Some(RawPriceInfo {
                    last_price: Some(100.0),
                    change: Some(1.5),
                    p_change: Some(1.52),
                    intra_day_high_low: None,
                }),
                ..Default::default()
            })
        }
    }

    fn service(source: Arc<StubSource>) -> QuoteService {
        let cache = Arc::new(QuoteCache::new(10, Duration::from_secs(60)));
        QuoteService::new(source, cache)
    }

    #[tokio::test]
    async fn test_second_lookup_served_from_cache() {
        let source = Arc::new(StubSource::new(vec!["TCS"]));
        let service = service(source.clone());

        let first = service.get_quote("tcs").await.unwrap();
        let second = service.get_quote("TCS").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.symbol, "TCS");
        assert_eq!(first.company_name.as_deref(), Some("TCS Limited"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_symbol_not_cached() {
        let source = Arc::new(StubSource::new(vec!["TCS"]));
        let service = service(source.clone());

        let err = service.get_quote("NOPE").await.unwrap_err();
        assert!(matches!(err, QuoteError::UnknownSymbol(ref s) if s == "NOPE"));
        let _ = service.get_quote("NOPE").await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let source = Arc::new(StubSource::failing());
        let service = service(source.clone());

        let err = service.get_quote("TCS").await.unwrap_err();
        assert!(matches!(err, QuoteError::Upstream(UpstreamError::Status(503))));
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_symbol_skips_source() {
        let source = Arc::new(StubSource::new(vec!["TCS"]));
        let service = service(source.clone());

        for bad in ["", "   ", "TCS;DROP", "ABCDEFGHIJKLMNOPQRSTUVWXYZ"] {
            let err = service.get_quote(bad).await.unwrap_err();
            assert!(matches!(err, QuoteError::InvalidSymbol(_)), "{bad:?}");
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" m&m ").unwrap(), "M&M");
        assert_eq!(normalize_symbol("\ttcs\n").unwrap(), "TCS");
        assert_eq!(normalize_symbol("bajaj-auto").unwrap(), "BAJAJ-AUTO");
        assert!(normalize_symbol("tcs/infy").is_err());
    }
}
