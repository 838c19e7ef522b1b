use std::error::Error;
use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use nse_quote::utils::display::DisplayFormatter;
use nse_quote::{AppConfig, AppState, QuoteServer};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nse_quote", version, about = "Cached NSE stock quote service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Address to listen on
        #[arg(long, env = "BIND_ADDR")]
        bind: Option<SocketAddr>,
    },
    /// Look up a single quote and print it
    Quote {
        /// NSE ticker symbol, e.g. TCS
        symbol: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            info!(
                capacity = config.cache.capacity,
                ttl_secs = config.cache.ttl_seconds,
                "Starting NSE quote service"
            );
            let state = AppState::new(config)?;
            QuoteServer::new(state).run().await?;
        }
        Command::Quote { symbol } => {
            debug!("Fetching quote for symbol: {}", symbol);
            let state = AppState::new(config)?;
            let quote = state.quotes.get_quote(&symbol).await?;
            println!("{}", DisplayFormatter::new().format_quote_summary(&quote));
        }
    }

    Ok(())
}
