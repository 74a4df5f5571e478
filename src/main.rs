//! Entry point for the Press Quote binary.
//!
//! Running this binary starts an HTTP server exposing the pricing
//! engine.  The bind address comes from `PRESS_QUOTE_BIND_ADDR` and an
//! optional table file from `PRESS_QUOTE_TABLES`; both may also be set
//! in a `.env` file.  Log output is controlled with `RUST_LOG`.

use anyhow::Result;
use press_quote::config::QuoteServiceConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "press_quote=info,tower_http=info".into()),
        )
        .init();

    let config = QuoteServiceConfig::load()?;
    info!(?config, "loaded configuration");

    let tables = config.initial_tables()?;
    press_quote::api::serve(&config.bind_addr, tables).await
}
