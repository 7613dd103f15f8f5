//! Platform-agnostic domain types.

mod ids;
mod market;
mod price;

pub use ids::VariantId;
pub use market::{AdjustmentPolicy, CountryConfig, RoundingRule};
pub use price::{
    CacheState, CacheStatus, MarketRoute, MarketSnapshot, PriceBook, PriceCalculation, PriceEntry,
    PriceUpdate, RefreshProgress, RefreshReport,
};
