//! Reference price to market price calculation.

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::domain::{AdjustmentPolicy, PriceCalculation};
use crate::error::{Error, Result};

use super::registry::CountryRegistry;
use super::rounding::{format_price, round};

/// Fixed reduction factor for markets outside the VAT adjustment path.
///
/// Carried over from observed production behavior: non-VAT markets get a
/// flat 10% off the reference price and ignore the caller's base adjustment.
/// Selection happens through [`AdjustmentPolicy`], so moving a market onto
/// the VAT path is a configuration change. Confirm with the pricing owner
/// before changing the constant itself.
pub const NON_VAT_REDUCTION: Decimal = dec!(0.90);

/// Parameters of one pricing operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingOperation {
    /// Adjustment applied before VAT on the VAT path, e.g. -0.12 for -12%.
    pub base_adjustment: Decimal,
    /// Whether the VAT path is active for `AdjustmentPolicy::Vat` markets.
    pub apply_vat: bool,
    /// Displayed discount target in (0, 1).
    pub discount_target: Decimal,
}

impl Default for PricingOperation {
    fn default() -> Self {
        Self {
            base_adjustment: dec!(-0.12),
            apply_vat: true,
            discount_target: dec!(0.40),
        }
    }
}

/// A reference product for bulk previews.
#[derive(Debug, Clone)]
pub struct ReferenceProduct {
    pub sku: Option<String>,
    pub title: String,
    /// EUR reference price.
    pub price_eur: Decimal,
}

/// One row of a bulk preview.
#[derive(Debug, Clone)]
pub struct PreviewRow {
    pub sku: Option<String>,
    pub title: String,
    pub market: String,
    pub reference_eur: Decimal,
    pub final_price: String,
    pub compare_at_price: String,
    pub currency: String,
    pub discount_percentage: Decimal,
}

/// Aggregate of a bulk preview across products and markets.
#[derive(Debug, Clone)]
pub struct BulkPreview {
    pub total_products: usize,
    pub total_markets: usize,
    pub total_updates: usize,
    pub rows: Vec<PreviewRow>,
}

/// Turns an EUR reference price into a market's final price and compare-at
/// price.
///
/// Purely functional over the registry's current configuration: no I/O, no
/// stored state. The only failure mode is an unknown market.
pub struct PricingCalculator {
    registry: Arc<CountryRegistry>,
}

impl PricingCalculator {
    #[must_use]
    pub fn new(registry: Arc<CountryRegistry>) -> Self {
        Self { registry }
    }

    /// Compute the final and compare-at price for one market.
    ///
    /// Steps: base adjustment (VAT path or fixed reduction), currency
    /// conversion, ending rule, compare-at derived from the *rounded* final
    /// price and re-rounded with the same rule. Because both endpoints are
    /// rounded independently, the realized discount only approximates the
    /// requested target; the realized number is what gets surfaced.
    pub fn calculate(
        &self,
        reference_eur: Decimal,
        market: &str,
        op: &PricingOperation,
    ) -> Result<PriceCalculation> {
        let config = self
            .registry
            .get(market)
            .ok_or_else(|| Error::ConfigNotFound {
                market: market.to_string(),
            })?;

        let adjusted = match config.adjustment {
            AdjustmentPolicy::Vat if op.apply_vat => {
                reference_eur * (Decimal::ONE + op.base_adjustment) * (Decimal::ONE + config.vat)
            }
            _ => reference_eur * NON_VAT_REDUCTION,
        };

        let converted = adjusted * config.exchange_rate;
        let final_price = round(converted, config.rule);

        // discount_target is validated at the config boundary; an out-of-range
        // value degrades to "no displayed discount" rather than dividing by zero.
        let compare_at = if op.discount_target > Decimal::ZERO && op.discount_target < Decimal::ONE
        {
            round(final_price / (Decimal::ONE - op.discount_target), config.rule)
        } else {
            final_price
        };

        let discount_percentage = if compare_at > Decimal::ZERO {
            ((compare_at - final_price) / compare_at * dec!(100))
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        };

        Ok(PriceCalculation {
            market: market.to_string(),
            currency: config.currency.clone(),
            reference_price: reference_eur,
            final_price: format_price(final_price, &config.currency),
            compare_at_price: format_price(compare_at, &config.currency),
            discount_percentage,
        })
    }

    /// Calculate for several markets, skipping unknown ones.
    #[must_use]
    pub fn calculate_for_markets(
        &self,
        reference_eur: Decimal,
        markets: &[String],
        op: &PricingOperation,
    ) -> Vec<PriceCalculation> {
        markets
            .iter()
            .filter_map(|market| self.calculate(reference_eur, market, op).ok())
            .collect()
    }

    /// Calculate for every configured market.
    #[must_use]
    pub fn calculate_for_all(
        &self,
        reference_eur: Decimal,
        op: &PricingOperation,
    ) -> Vec<PriceCalculation> {
        self.calculate_for_markets(reference_eur, &self.registry.market_names(), op)
    }

    /// Preview a bulk update across products and markets without touching
    /// anything.
    #[must_use]
    pub fn preview(
        &self,
        products: &[ReferenceProduct],
        markets: &[String],
        op: &PricingOperation,
    ) -> BulkPreview {
        let mut rows = Vec::with_capacity(products.len() * markets.len());
        for product in products {
            for market in markets {
                if let Ok(calc) = self.calculate(product.price_eur, market, op) {
                    rows.push(PreviewRow {
                        sku: product.sku.clone(),
                        title: product.title.clone(),
                        market: market.clone(),
                        reference_eur: product.price_eur,
                        final_price: calc.final_price,
                        compare_at_price: calc.compare_at_price,
                        currency: calc.currency,
                        discount_percentage: calc.discount_percentage,
                    });
                }
            }
        }
        BulkPreview {
            total_products: products.len(),
            total_markets: markets.len(),
            total_updates: rows.len(),
            rows,
        }
    }
}
