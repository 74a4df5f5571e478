//! Service configuration.
//!
//! The HTTP service reads its settings from the environment, after
//! loading a `.env` file if one is present.  Nothing here is consulted
//! by the pricing functions themselves.

use crate::tables::{load_tables_from_file, PricingTables};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteServiceConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// JSON file with the pricing tables.  The built-in rate sheet is
    /// used when unset.
    pub tables_path: Option<PathBuf>,
}

impl Default for QuoteServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            tables_path: None,
        }
    }
}

impl QuoteServiceConfig {
    /// Load configuration from `.env` and the process environment.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();
        if let Ok(addr) = std::env::var("PRESS_QUOTE_BIND_ADDR") {
            cfg.bind_addr = addr;
        }
        if let Ok(path) = std::env::var("PRESS_QUOTE_TABLES") {
            if !path.trim().is_empty() {
                cfg.tables_path = Some(PathBuf::from(path));
            }
        }
        Ok(cfg)
    }

    /// The table snapshot the server starts with.
    pub fn initial_tables(&self) -> Result<PricingTables> {
        match &self.tables_path {
            Some(path) => load_tables_from_file(path)
                .with_context(|| format!("loading pricing tables from {}", path.display())),
            None => {
                info!("no PRESS_QUOTE_TABLES set, using built-in rate sheet");
                Ok(PricingTables::default())
            }
        }
    }
}
