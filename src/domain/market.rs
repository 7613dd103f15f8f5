//! Market configuration types.
//!
//! - [`CountryConfig`] - Per-market pricing configuration
//! - [`RoundingRule`] - Psychological-ending family applied after conversion
//! - [`AdjustmentPolicy`] - Which base-adjustment path the calculator takes

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Psychological-ending family for a market.
///
/// Rule identifiers match the configuration vocabulary (`ending_99`,
/// `huf_pattern`, ...). Every rule is idempotent: applying it to an already
/// rounded price returns the price unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingRule {
    /// `floor(x) + 0.99`.
    #[serde(rename = "ending_99")]
    Ending99,
    /// `floor(x) + 0.95`.
    #[serde(rename = "ending_95")]
    Ending95,
    /// Nearest integer, midpoint away from zero.
    #[serde(rename = "ending_00")]
    Ending00,
    /// Nearest integer ending in 9 at or below the input; 9 below 10.
    #[serde(rename = "ending_9_int")]
    Ending9Int,
    /// Nearest multiple of 1000, never below 1000.
    Thousands,
    /// HUF/CZK/RSD family: ...990 / ...90 / ...9 by magnitude.
    HufPattern,
    /// Nearest multiple of 5.
    #[serde(rename = "nordic_5")]
    Nordic5,
}

/// Which base-adjustment path [`calculate`](crate::pricing::PricingCalculator::calculate)
/// takes for a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentPolicy {
    /// Apply the caller's base adjustment then the market's VAT.
    Vat,
    /// Fixed 10% reduction, ignoring the caller's base adjustment.
    Minus10,
    /// No dedicated policy; falls back to the fixed reduction.
    None,
}

/// Pricing configuration for a single market.
///
/// Identity is the market name exactly as the platform spells it (the name is
/// never normalized). Exchange rate and VAT are hot-patchable through the
/// registry; everything else is fixed at process start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryConfig {
    /// ISO 4217 currency code.
    pub currency: String,
    /// Psychological-ending rule applied after conversion.
    pub rule: RoundingRule,
    /// Flat VAT multiplier in `[0, 1)`.
    pub vat: Decimal,
    /// EUR-denominated exchange rate, strictly positive.
    pub exchange_rate: Decimal,
    /// Base-adjustment path selection.
    pub adjustment: AdjustmentPolicy,
}

impl CountryConfig {
    /// Whether this market's currency renders without decimal places.
    #[must_use]
    pub fn integer_currency(&self) -> bool {
        crate::pricing::is_integer_currency(&self.currency)
    }
}
