//! Error types for the crate.
//!
//! Every failure mode in the cache/pricing subsystem maps to a variant here;
//! nothing in this crate panics on a failure path. Refresh and persistence
//! errors degrade to "keep serving the last good data".

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A market name was passed that has no entry in the country registry.
    #[error("market not configured: {market}")]
    ConfigNotFound { market: String },

    /// A refresh was requested while another refresh holds the cache.
    #[error("cache refresh already in progress")]
    RefreshAlreadyInProgress,

    /// A single market's price-list pagination failed during a refresh.
    /// The market is omitted from the new cache; the refresh continues.
    #[error("failed to fetch prices for market '{market}': {reason}")]
    MarketFetchFailed { market: String, reason: String },

    /// The top-level market enumeration call failed. The refresh is aborted
    /// and the previously served cache is retained.
    #[error("market enumeration failed: {0}")]
    EnumerationFailed(String),

    /// Snapshot file read/write failed. The in-memory cache remains
    /// authoritative.
    #[error("snapshot persistence failed: {0}")]
    PersistenceFailed(String),

    /// The platform returned userErrors for a GraphQL document.
    #[error("platform rejected '{operation}': {errors:?}")]
    Platform {
        operation: &'static str,
        errors: Vec<String>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap any error as a per-market fetch failure.
    pub fn market_fetch(market: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::MarketFetchFailed {
            market: market.into(),
            reason: err.to_string(),
        }
    }

    /// Wrap any error as a persistence failure.
    pub fn persistence(err: impl std::fmt::Display) -> Self {
        Self::PersistenceFailed(err.to_string())
    }
}
