//! Shared test support: a scripted in-memory price list source.
//!
//! `ScriptedSource` stands in for the GraphQL client so cache behavior can
//! be exercised without a network: fixed market lists, multi-page price
//! lists, injected failures and per-page delays.

// Each test binary compiles this module separately and uses a different
// subset of the harness.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use pricehub::error::{Error, Result};
use pricehub::shopify::{
    MarketListing, PriceListEntry, PriceListPage, PriceListSource, PriceWrite, WriteOutcome,
};

pub fn listing(name: &str, n: u32, currency: &str) -> MarketListing {
    MarketListing {
        market_id: format!("gid://shopify/Market/{n}"),
        name: name.to_string(),
        price_list_id: format!("gid://shopify/PriceList/{n}"),
        currency: currency.to_string(),
    }
}

pub fn entry(variant_id: &str, price: &str, compare_at: Option<&str>, currency: &str) -> PriceListEntry {
    PriceListEntry {
        variant_id: variant_id.to_string(),
        price: price.to_string(),
        compare_at_price: compare_at.map(str::to_string),
        currency: currency.to_string(),
    }
}

/// In-memory [`PriceListSource`] driven entirely by the test.
#[derive(Default)]
pub struct ScriptedSource {
    markets: Vec<MarketListing>,
    /// Pages per price list id; the cursor is the next page index.
    pages: HashMap<String, Vec<Vec<PriceListEntry>>>,
    fail_enumeration: bool,
    failing_lists: HashSet<String>,
    page_delay: Option<Duration>,
    page_calls: AtomicUsize,
    writes: Mutex<Vec<PriceWrite>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a market with its price list split into pages.
    pub fn with_market(
        mut self,
        listing: MarketListing,
        pages: Vec<Vec<PriceListEntry>>,
    ) -> Self {
        self.pages.insert(listing.price_list_id.clone(), pages);
        self.markets.push(listing);
        self
    }

    /// Make `list_markets` fail.
    pub fn fail_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    /// Make every page fetch for one price list fail.
    pub fn fail_list(mut self, price_list_id: &str) -> Self {
        self.failing_lists.insert(price_list_id.to_string());
        self
    }

    /// Sleep this long before serving each page.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = Some(delay);
        self
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn recorded_writes(&self) -> Vec<PriceWrite> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceListSource for ScriptedSource {
    async fn list_markets(&self) -> Result<Vec<MarketListing>> {
        if self.fail_enumeration {
            return Err(Error::Platform {
                operation: "MarketsWithPriceLists",
                errors: vec!["scripted enumeration failure".to_string()],
            });
        }
        Ok(self.markets.clone())
    }

    async fn price_list_page(
        &self,
        price_list_id: &str,
        cursor: Option<&str>,
    ) -> Result<PriceListPage> {
        if let Some(delay) = self.page_delay {
            tokio::time::sleep(delay).await;
        }
        self.page_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_lists.contains(price_list_id) {
            return Err(Error::Platform {
                operation: "PriceListPage",
                errors: vec!["scripted page failure".to_string()],
            });
        }

        let pages = self.pages.get(price_list_id).cloned().unwrap_or_default();
        let index: usize = cursor.map(|c| c.parse().unwrap_or(0)).unwrap_or(0);
        let entries = pages.get(index).cloned().unwrap_or_default();
        let next_cursor = if index + 1 < pages.len() {
            Some((index + 1).to_string())
        } else {
            None
        };

        Ok(PriceListPage {
            entries,
            next_cursor,
        })
    }

    async fn write_prices(
        &self,
        _price_list_id: &str,
        writes: &[PriceWrite],
    ) -> Result<WriteOutcome> {
        self.writes.lock().unwrap().extend_from_slice(writes);
        Ok(WriteOutcome {
            succeeded: writes.len(),
            errors: Vec::new(),
        })
    }
}
