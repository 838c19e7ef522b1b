use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::api::QuoteSource;
use crate::error::UpstreamError;
use crate::models::quote::RawQuote;

pub const DEFAULT_BASE_URL: &str = "https://www.nseindia.com";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Client for the NSE India equity quote API.
///
/// NSE rejects API calls without the session cookies its home page hands out,
/// and those cookies expire after a few minutes. The home page is loaded into
/// the client's cookie store before the first fetch, and loaded again whenever
/// the API answers 401 or 403.
pub struct NseClient {
    client: Client,
    base_url: String,
    primed: Mutex<bool>,
}

impl NseClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            primed: Mutex::new(false),
        })
    }

    async fn ensure_session(&self) -> Result<(), UpstreamError> {
        let mut primed = self.primed.lock().await;
        if *primed {
            return Ok(());
        }

        debug!("Priming NSE session cookies from {}", self.base_url);
        let response = self.client.get(&self.base_url).send().await?;
        if response.status().is_success() {
            *primed = true;
        } else {
            // try again on the next fetch
            warn!(status = %response.status(), "NSE home page did not return success");
        }
        Ok(())
    }

    async fn reset_session(&self) {
        *self.primed.lock().await = false;
    }

    async fn request_quote(&self, symbol: &str) -> Result<Response, UpstreamError> {
        self.ensure_session().await?;

        let url = format!("{}/api/quote-equity", self.base_url);
        debug!("Sending request to {}", url);
        Ok(self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?)
    }
}

fn is_session_rejected(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

#[async_trait]
impl QuoteSource for NseClient {
    #[instrument(skip(self))]
    async fn fetch_raw_quote(&self, symbol: &str) -> Result<RawQuote, UpstreamError> {
        let mut response = self.request_quote(symbol).await?;

        // Session cookies expired, prime again and retry once
        if is_session_rejected(response.status()) {
            debug!(status = %response.status(), "NSE session rejected, re-priming");
            self.reset_session().await;
            response = self.request_quote(symbol).await?;
        }

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("NSE rate limit hit");
            return Err(UpstreamError::RateLimited);
        }
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        // Parse response
        let body = response.bytes().await?;
        let raw: RawQuote = serde_json::from_slice(&body)?;
        debug!(empty = raw.is_empty(), "Decoded NSE quote");
        Ok(raw)
    }
}
