//! Mutable market-configuration store.

use std::collections::HashMap;

use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::domain::CountryConfig;
use crate::error::{Error, Result};

use super::countries::builtin_markets;

/// Guarded table of per-market pricing configuration.
///
/// Read by every price calculation, written only when an operator patches an
/// exchange rate or VAT value, so a read-write lock fits. Updates return the
/// previous value so callers can log the change; unknown markets are a typed
/// error, never a silent insert.
pub struct CountryRegistry {
    markets: RwLock<HashMap<String, CountryConfig>>,
}

impl CountryRegistry {
    /// Registry seeded with the built-in market table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_table(builtin_markets())
    }

    /// Registry from an explicit table. Used by tests and bespoke setups.
    #[must_use]
    pub fn from_table(table: impl IntoIterator<Item = (String, CountryConfig)>) -> Self {
        Self {
            markets: RwLock::new(table.into_iter().collect()),
        }
    }

    /// Configuration for a market, cloned out of the guard.
    #[must_use]
    pub fn get(&self, market: &str) -> Option<CountryConfig> {
        self.markets.read().get(market).cloned()
    }

    /// All configured market names, sorted for stable output.
    #[must_use]
    pub fn market_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.markets.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of configured markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.read().is_empty()
    }

    /// Replace a market's exchange rate, returning the previous rate.
    pub fn set_exchange_rate(&self, market: &str, rate: Decimal) -> Result<Decimal> {
        let mut markets = self.markets.write();
        let config = markets.get_mut(market).ok_or_else(|| Error::ConfigNotFound {
            market: market.to_string(),
        })?;
        Ok(std::mem::replace(&mut config.exchange_rate, rate))
    }

    /// Replace a market's VAT rate, returning the previous rate.
    pub fn set_vat(&self, market: &str, vat: Decimal) -> Result<Decimal> {
        let mut markets = self.markets.write();
        let config = markets.get_mut(market).ok_or_else(|| Error::ConfigNotFound {
            market: market.to_string(),
        })?;
        Ok(std::mem::replace(&mut config.vat, vat))
    }
}

impl Default for CountryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
