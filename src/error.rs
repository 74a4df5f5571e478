//! Error types for the Press Quote engine.
//!
//! Pricing itself never fails: unsupported size/weight/paper
//! combinations degrade to a zero contribution.  The errors here cover
//! the structural problems around it: a rate sheet that would yield
//! NaN or infinite prices, quantities and color counts outside what the
//! shop runs, and table files that cannot be read.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for engine operations.
pub type QuoteResult<T> = Result<T, QuoteError>;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum QuoteError {
    /// A rate table value is unusable (zero throughput, negative cost, NaN).
    #[error("Invalid rate table value for '{field}': {value} - {reason}")]
    InvalidRateTable {
        field: String,
        value: String,
        reason: String,
    },

    /// A job quantity outside the range the builders accept.
    #[error("Invalid quantity {quantity}: must be between {min} and {max}")]
    InvalidQuantity { quantity: u32, min: u32, max: u32 },

    /// More ink or foil colors on one face than a press run can carry.
    #[error("Too many {process} colors on the {side}: {count} (at most {max})")]
    InvalidColorCount {
        side: String,
        process: String,
        count: u32,
        max: u32,
    },

    /// A table file could not be read or parsed.
    #[error("Failed to load pricing tables from '{path}': {reason}")]
    TableLoad { path: String, reason: String },
}

impl QuoteError {
    pub fn invalid_rate(field: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        QuoteError::InvalidRateTable {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn table_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::TableLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Short error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteError::InvalidRateTable { .. } => "INVALID_RATE_TABLE",
            QuoteError::InvalidQuantity { .. } => "INVALID_QUANTITY",
            QuoteError::InvalidColorCount { .. } => "INVALID_COLOR_COUNT",
            QuoteError::TableLoad { .. } => "TABLE_LOAD",
        }
    }
}
