//! Press Quote library crate.
//!
//! This crate exposes the letterpress pricing engine and API
//! components as reusable modules.  Front ends (a standalone
//! calculator, a storefront) depend on the `press_quote` crate and call
//! [`card::price_card`], [`envelope::price_envelope`] or
//! [`engine::price_suite`] directly, or embed the HTTP API via
//! [`api::build_router`].
//!
//! All pricing functions are pure: the same specification and tables
//! always produce the same price, and nothing is cached between calls.

pub mod api;
pub mod card;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod models;
pub mod options;
pub mod tables;

pub use card::{price_card, EffectiveJob, PricingStrategy};
pub use engine::price_suite;
pub use envelope::price_envelope;
pub use error::{QuoteError, QuoteResult};
pub use options::{CardJobBuilder, CardUpdate, EnvelopeJobBuilder, EnvelopeUpdate};
pub use tables::PricingTables;
