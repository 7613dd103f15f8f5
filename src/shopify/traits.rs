//! Platform source trait definitions.
//!
//! These types define the interface the price cache consumes. Everything here
//! is platform-shaped but transport-free.

use async_trait::async_trait;

use crate::domain::VariantId;
use crate::error::Result;

/// A market the platform reports as having a price list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketListing {
    /// Platform market gid.
    pub market_id: String,
    /// Exact market name; identity for cache and registry lookups.
    pub name: String,
    /// Price-list gid to paginate.
    pub price_list_id: String,
    pub currency: String,
}

/// One price row as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceListEntry {
    /// Raw variant identifier, either shape; normalized by the cache.
    pub variant_id: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub currency: String,
}

/// One page of price-list entries.
#[derive(Debug, Clone, Default)]
pub struct PriceListPage {
    pub entries: Vec<PriceListEntry>,
    /// Cursor for the next page; `None` terminates the pagination loop.
    pub next_cursor: Option<String>,
}

/// One price to write back to the platform.
#[derive(Debug, Clone)]
pub struct PriceWrite {
    pub variant_id: VariantId,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub currency: String,
}

/// Per-item outcome of a batched write. Partial success is normal.
#[derive(Debug, Clone, Default)]
pub struct WriteOutcome {
    pub succeeded: usize,
    /// One message per rejected item/field.
    pub errors: Vec<String>,
}

/// Read/write access to the platform's per-market price lists.
#[async_trait]
pub trait PriceListSource: Send + Sync {
    /// Enumerate markets that have a price list.
    async fn list_markets(&self) -> Result<Vec<MarketListing>>;

    /// Fetch one page of a price list. Callers loop until `next_cursor`
    /// comes back `None`.
    async fn price_list_page(
        &self,
        price_list_id: &str,
        cursor: Option<&str>,
    ) -> Result<PriceListPage>;

    /// Write a batch of fixed prices, best effort.
    async fn write_prices(
        &self,
        price_list_id: &str,
        writes: &[PriceWrite],
    ) -> Result<WriteOutcome>;
}
