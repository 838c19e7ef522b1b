//! HTTP front end for the quote service.
//!
//! - `GET /health` - liveness probe
//! - `GET /stock/:symbol` - cached quote for one NSE symbol

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::models::cache::{Clock, TtlCache};

pub struct QuoteServer {
    state: Arc<AppState>,
}

impl QuoteServer {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Creates the router with all routes and layers configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Serves until Ctrl-C, sweeping expired cache entries in the background.
    pub async fn run(self) -> std::io::Result<()> {
        let addr = self.state.config.bind_addr;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Quote server listening on {}", addr);

        let sweeper = tokio::spawn(sweep_expired(
            self.state.quotes.cache().clone(),
            self.state.config.sweep_interval,
        ));

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await;

        sweeper.abort();
        info!("Shutting down");
        result
    }
}

async fn sweep_expired<V, C>(cache: Arc<TtlCache<V, C>>, period: Duration)
where
    V: Clone + Send + 'static,
    C: Clock + 'static,
{
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        sweep_once(&cache);
    }
}

/// Drops expired entries and returns how many were removed.
fn sweep_once<V: Clone, C: Clock>(cache: &TtlCache<V, C>) -> usize {
    let purged = cache.purge_expired();
    if purged > 0 {
        let stats = cache.stats();
        debug!(
            purged,
            live = stats.live_entries,
            capacity = stats.capacity,
            "Swept quote cache"
        );
    }
    purged
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
