//! Deterministic pricing: rounding rules, market configuration, calculation.

mod calculator;
mod countries;
mod registry;
mod rounding;

pub use calculator::{
    BulkPreview, PreviewRow, PricingCalculator, PricingOperation, ReferenceProduct,
    NON_VAT_REDUCTION,
};
pub use countries::builtin_markets;
pub use registry::CountryRegistry;
pub use rounding::{format_price, is_integer_currency, round};
