//! Shared handler state.

use std::sync::Arc;

use crate::api::nse::NseClient;
use crate::api::QuoteSource;
use crate::config::AppConfig;
use crate::error::UpstreamError;
use crate::models::cache::QuoteCache;
use crate::services::quote_service::QuoteService;

pub struct AppState {
    pub config: AppConfig,
    pub quotes: QuoteService,
}

impl AppState {
    /// Builds state backed by the live NSE client.
    pub fn new(config: AppConfig) -> Result<Self, UpstreamError> {
        let client = NseClient::new(&config.nse_base_url, config.upstream_timeout)?;
        Ok(Self::with_source(config, Arc::new(client)))
    }

    pub fn with_source(config: AppConfig, source: Arc<dyn QuoteSource>) -> Self {
        let cache = Arc::new(QuoteCache::with_config(&config.cache));
        Self {
            quotes: QuoteService::new(source, cache),
            config,
        }
    }
}
