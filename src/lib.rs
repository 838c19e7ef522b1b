pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;

// Re-export commonly used items
pub use api::nse::NseClient;
pub use api::QuoteSource;
pub use config::AppConfig;
pub use error::{ConfigError, QuoteError, UpstreamError};
pub use models::cache::{CacheConfig, QuoteCache, TtlCache};
pub use models::quote::Quote;
pub use server::{AppState, QuoteServer};
pub use services::quote_service::QuoteService;
