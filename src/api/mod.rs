pub mod nse;

use async_trait::async_trait;

use crate::error::UpstreamError;
use crate::models::quote::RawQuote;

/// Provider of raw quote records for a symbol.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetches the provider's raw record for an already-normalized symbol.
    async fn fetch_raw_quote(&self, symbol: &str) -> Result<RawQuote, UpstreamError>;
}
