//! Pricehub - Multi-market retail price cache and pricing engine.
//!
//! Two halves that share the domain types:
//!
//! - **`cache`** - A warm, concurrency-safe snapshot of every market's
//!   current prices, loaded from the Shopify GraphQL Admin API in the
//!   background and persisted to disk across restarts. Readers are never
//!   blocked by a refresh and never see a half-built book.
//! - **`pricing`** - A deterministic calculator that turns a EUR reference
//!   price into a local market price with psychological endings
//!   (`.99`, `.95`, whole numbers, Hungarian `990` patterns, Nordic
//!   5-steps) plus a compare-at price realizing a displayed discount.
//!
//! # Modules
//!
//! - [`config`] - TOML configuration with env-var token override
//! - [`domain`] - Platform-agnostic types: variant ids, snapshots, market rules
//! - [`pricing`] - Rounding rules, the country registry and the calculator
//! - [`cache`] - The price cache and its persisted snapshot format
//! - [`shopify`] - The GraphQL client behind the [`shopify::PriceListSource`] trait
//! - [`app`] - Daemon orchestration: warm start and the periodic refresh loop
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pricehub::pricing::{CountryRegistry, PricingCalculator, PricingOperation};
//! use rust_decimal_macros::dec;
//!
//! let registry = Arc::new(CountryRegistry::builtin());
//! let calculator = PricingCalculator::new(registry);
//! let result = calculator
//!     .calculate(dec!(100), "France", &PricingOperation::default())
//!     .unwrap();
//! println!("{} {}", result.final_price, result.currency);
//! ```

pub mod app;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pricing;
pub mod shopify;

pub use error::{Error, Result};
