//! Price snapshot and calculation types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::VariantId;

/// Current price of one variant in one market.
///
/// Amounts stay in the platform's decimal-string form so a snapshot
/// round-trips byte-identically. A missing compare-at price means no discount
/// is displayed for that variant in that market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<String>,
    pub currency: String,
}

/// All current prices of a single market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Platform market gid.
    pub market_id: String,
    pub currency: String,
    /// Platform price-list gid this snapshot was read from.
    pub price_list_id: String,
    pub prices: HashMap<VariantId, PriceEntry>,
}

/// The complete set of market snapshots, keyed by exact market name.
pub type PriceBook = HashMap<String, MarketSnapshot>;

/// Where write-backs for a market go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRoute {
    pub market_id: String,
    pub price_list_id: String,
    pub currency: String,
}

/// One incremental price change to apply after a successful write-back.
#[derive(Debug, Clone)]
pub struct PriceUpdate {
    pub market: String,
    pub variant_id: VariantId,
    pub price: String,
    pub compare_at_price: Option<String>,
}

/// Result of one market-price calculation. Ephemeral, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceCalculation {
    pub market: String,
    pub currency: String,
    /// EUR reference price the calculation started from.
    pub reference_price: Decimal,
    /// Rounded final price, formatted for the market's currency.
    pub final_price: String,
    /// Rounded compare-at price, formatted for the market's currency.
    pub compare_at_price: String,
    /// Realized discount in percent, one decimal place. This is what users
    /// see, not the requested target.
    pub discount_percentage: Decimal,
}

/// Lifecycle state of the price cache.
///
/// Transitions are `Empty -> Loading -> Ready` and `Ready -> Loading ->
/// Ready` only. A failed refresh falls back to the previous state; readers
/// never observe a partially built book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CacheState {
    Empty = 0,
    Loading = 1,
    Ready = 2,
}

impl CacheState {
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Loading,
            2 => Self::Ready,
            _ => Self::Empty,
        }
    }
}

/// Progress counters for an in-flight refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshProgress {
    pub current_market: String,
    pub markets_done: usize,
    pub total_markets: usize,
    pub total_prices: usize,
}

/// Point-in-time view of the cache, cheap to produce.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub state: CacheState,
    pub market_count: usize,
    pub total_item_count: usize,
    pub last_refresh: Option<DateTime<Utc>>,
    pub progress: RefreshProgress,
}

/// Outcome of a completed refresh.
///
/// Per-market failures are reported here rather than failing the refresh;
/// a failed market is simply absent from the new book.
#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    pub markets_loaded: usize,
    pub total_prices: usize,
    /// `(market name, reason)` for every market that errored or timed out.
    pub failed: Vec<(String, String)>,
}
