//! Warm in-memory price cache.
//!
//! Owns the authoritative snapshot of per-market current prices. A refresh
//! builds a brand-new book beside the served one and swaps it in with a
//! single assignment under the write lock, so readers always see a complete
//! book from exactly one refresh cycle. Failures degrade to "keep serving
//! the last good book", never to serving nothing.

mod snapshot;

pub use snapshot::PersistedSnapshot;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::domain::{
    CacheState, CacheStatus, MarketRoute, MarketSnapshot, PriceBook, PriceEntry, PriceUpdate,
    RefreshProgress, RefreshReport, VariantId,
};
use crate::error::{Error, Result};
use crate::shopify::{MarketListing, PriceListSource};

/// Concurrency-safe cache of every market's current prices.
pub struct PriceCache {
    /// The served book. Replaced wholesale at the end of a refresh.
    book: RwLock<PriceBook>,
    /// Patches received while a refresh was loading; drained onto the new
    /// book inside the same critical section as the swap.
    pending: Mutex<Vec<PriceUpdate>>,
    /// `CacheState` as its `u8` repr, lock-free for status reads.
    state: AtomicU8,
    market_count: AtomicUsize,
    item_count: AtomicUsize,
    last_refresh: RwLock<Option<DateTime<Utc>>>,
    progress: Mutex<RefreshProgress>,
    /// Mutual exclusion for refreshes. `try_lock` makes a second refresh
    /// fail fast instead of queueing.
    refresh_gate: tokio::sync::Mutex<()>,
    config: CacheConfig,
}

impl PriceCache {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            book: RwLock::new(PriceBook::new()),
            pending: Mutex::new(Vec::new()),
            state: AtomicU8::new(CacheState::Empty as u8),
            market_count: AtomicUsize::new(0),
            item_count: AtomicUsize::new(0),
            last_refresh: RwLock::new(None),
            progress: Mutex::new(RefreshProgress::default()),
            refresh_gate: tokio::sync::Mutex::new(()),
            config,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> CacheState {
        CacheState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: CacheState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Cheap point-in-time view; counter reads never touch the book lock.
    #[must_use]
    pub fn status(&self) -> CacheStatus {
        CacheStatus {
            state: self.state(),
            market_count: self.market_count.load(Ordering::Relaxed),
            total_item_count: self.item_count.load(Ordering::Relaxed),
            last_refresh: *self.last_refresh.read(),
            progress: self.progress.lock().clone(),
        }
    }

    /// Current price of a variant in a market, either identifier shape.
    #[must_use]
    pub fn lookup(&self, market: &str, raw_id: &str) -> Option<PriceEntry> {
        let id = VariantId::normalize(raw_id);
        self.book.read().get(market)?.prices.get(&id).cloned()
    }

    /// Prices for several variants across several markets.
    ///
    /// Markets absent from the book, and markets where none of the requested
    /// variants have a price, are omitted rather than reported as errors.
    #[must_use]
    pub fn lookup_batch(
        &self,
        variant_ids: &[VariantId],
        markets: &[String],
    ) -> HashMap<String, MarketSnapshot> {
        let book = self.book.read();
        let mut result = HashMap::new();

        for market in markets {
            let Some(snapshot) = book.get(market) else {
                continue;
            };
            let prices: HashMap<VariantId, PriceEntry> = variant_ids
                .iter()
                .filter_map(|id| snapshot.prices.get(id).map(|e| (id.clone(), e.clone())))
                .collect();
            if !prices.is_empty() {
                result.insert(
                    market.clone(),
                    MarketSnapshot {
                        market_id: snapshot.market_id.clone(),
                        currency: snapshot.currency.clone(),
                        price_list_id: snapshot.price_list_id.clone(),
                        prices,
                    },
                );
            }
        }

        result
    }

    /// Routing info for write-backs to a market's price list.
    #[must_use]
    pub fn route(&self, market: &str) -> Option<MarketRoute> {
        let book = self.book.read();
        let snapshot = book.get(market)?;
        Some(MarketRoute {
            market_id: snapshot.market_id.clone(),
            price_list_id: snapshot.price_list_id.clone(),
            currency: snapshot.currency.clone(),
        })
    }

    /// Apply incremental updates after a successful platform write-back.
    ///
    /// Updates are keyed with the same normalization as `lookup`, so either
    /// identifier shape patches the same entry. While a refresh is loading,
    /// updates are queued and land on the new book right after the swap;
    /// the returned count includes queued updates.
    pub fn patch(&self, updates: Vec<PriceUpdate>) -> usize {
        let queued;
        {
            let mut book = self.book.write();
            // State can only flip to Loading under this lock, so the check
            // and the application are one atomic step with respect to the
            // refresh swap.
            if self.state() != CacheState::Loading {
                let applied = Self::apply_updates(&mut book, updates);
                self.item_count
                    .store(Self::count_items(&book), Ordering::Relaxed);
                return applied;
            }
            queued = updates.len();
            self.pending.lock().extend(updates);
        }
        debug!(queued, "Refresh in progress, queued patches for after the swap");
        queued
    }

    /// Rebuild the whole book from the platform.
    ///
    /// Fails fast with [`Error::RefreshAlreadyInProgress`] when a refresh is
    /// running, and with [`Error::EnumerationFailed`] (old book untouched)
    /// when the market list cannot be fetched. Individual market failures
    /// only drop that market from the new book and are reported in the
    /// returned [`RefreshReport`].
    pub async fn refresh(&self, source: &dyn PriceListSource) -> Result<RefreshReport> {
        let Ok(_gate) = self.refresh_gate.try_lock() else {
            return Err(Error::RefreshAlreadyInProgress);
        };

        let previous_state = self.state();
        {
            // Taking the book lock orders the transition against in-flight
            // patches (see `patch`).
            let _book = self.book.write();
            self.set_state(CacheState::Loading);
        }
        *self.progress.lock() = RefreshProgress {
            current_market: "enumerating markets".into(),
            ..RefreshProgress::default()
        };

        match self.run_refresh(source).await {
            Ok(report) => Ok(report),
            Err(err) => {
                // Roll back: keep serving whatever we had, and don't strand
                // patches that were queued while we were loading.
                let mut book = self.book.write();
                self.set_state(previous_state);
                let replayed = self.drain_pending(&mut book);
                if replayed > 0 {
                    self.item_count
                        .store(Self::count_items(&book), Ordering::Relaxed);
                }
                warn!(error = %err, "Refresh failed, previous book retained");
                Err(err)
            }
        }
    }

    async fn run_refresh(&self, source: &dyn PriceListSource) -> Result<RefreshReport> {
        let markets = source
            .list_markets()
            .await
            .map_err(|err| Error::EnumerationFailed(err.to_string()))?;

        info!(markets = markets.len(), "Starting price cache refresh");
        self.progress.lock().total_markets = markets.len();

        let timeout = Duration::from_secs(self.config.market_timeout_secs);
        let mut new_book = PriceBook::new();
        let mut report = RefreshReport::default();

        // Markets are independent; fetch a few at a time. Pages within one
        // market stay sequential because each page needs the previous cursor.
        for batch in markets.chunks(self.config.market_concurrency.max(1)) {
            let fetches = batch.iter().map(|listing| async move {
                let outcome = match tokio::time::timeout(
                    timeout,
                    Self::fetch_market(source, listing),
                )
                .await
                {
                    Ok(Ok(snapshot)) => Ok(snapshot),
                    Ok(Err(err)) => Err(err),
                    Err(_) => Err(Error::market_fetch(&listing.name, "deadline exceeded")),
                };
                (listing, outcome)
            });

            for (listing, outcome) in join_all(fetches).await {
                let mut progress = self.progress.lock();
                progress.markets_done += 1;
                progress.current_market = listing.name.clone();

                match outcome {
                    Ok(snapshot) => {
                        progress.total_prices += snapshot.prices.len();
                        drop(progress);
                        debug!(
                            market = %listing.name,
                            prices = snapshot.prices.len(),
                            "Loaded market prices"
                        );
                        report.markets_loaded += 1;
                        report.total_prices += snapshot.prices.len();
                        new_book.insert(listing.name.clone(), snapshot);
                    }
                    Err(err) => {
                        drop(progress);
                        warn!(market = %listing.name, error = %err, "Market dropped from refresh");
                        report.failed.push((listing.name.clone(), err.to_string()));
                    }
                }
            }
        }

        let now = Utc::now();
        {
            let mut book = self.book.write();
            // The swap: a single assignment, readers see old or new, never a mix.
            *book = new_book;
            let replayed = self.drain_pending(&mut book);
            if replayed > 0 {
                debug!(replayed, "Applied queued patches onto the new book");
            }
            self.market_count.store(book.len(), Ordering::Relaxed);
            self.item_count
                .store(Self::count_items(&book), Ordering::Relaxed);
            self.set_state(CacheState::Ready);
        }
        *self.last_refresh.write() = Some(now);
        self.progress.lock().current_market = "done".into();

        info!(
            markets = report.markets_loaded,
            prices = report.total_prices,
            failed = report.failed.len(),
            "Price cache refresh complete"
        );

        if let Err(err) = self.save_to_disk() {
            // In-memory book stays authoritative; serving continues.
            warn!(error = %err, "Failed to persist snapshot after refresh");
        }

        Ok(report)
    }

    /// Paginate one market's full price list into a snapshot.
    async fn fetch_market(
        source: &dyn PriceListSource,
        listing: &MarketListing,
    ) -> Result<MarketSnapshot> {
        let mut prices = HashMap::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = source
                .price_list_page(&listing.price_list_id, cursor.as_deref())
                .await
                .map_err(|err| Error::market_fetch(&listing.name, err))?;

            for entry in page.entries {
                if !Self::valid_amount(&entry.price) {
                    debug!(
                        market = %listing.name,
                        variant = %entry.variant_id,
                        price = %entry.price,
                        "Skipping entry with invalid price"
                    );
                    continue;
                }
                prices.insert(
                    VariantId::normalize(&entry.variant_id),
                    PriceEntry {
                        price: entry.price,
                        compare_at_price: entry.compare_at_price,
                        currency: entry.currency,
                    },
                );
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(MarketSnapshot {
            market_id: listing.market_id.clone(),
            currency: listing.currency.clone(),
            price_list_id: listing.price_list_id.clone(),
            prices,
        })
    }

    /// A price must parse as a non-negative decimal.
    fn valid_amount(raw: &str) -> bool {
        Decimal::from_str(raw).is_ok_and(|d| d >= Decimal::ZERO)
    }

    fn apply_updates(book: &mut PriceBook, updates: Vec<PriceUpdate>) -> usize {
        let mut applied = 0;
        for update in updates {
            let Some(snapshot) = book.get_mut(&update.market) else {
                debug!(market = %update.market, "Patch for market absent from book, skipped");
                continue;
            };
            let currency = snapshot.currency.clone();
            snapshot.prices.insert(
                update.variant_id,
                PriceEntry {
                    price: update.price,
                    compare_at_price: update.compare_at_price,
                    currency,
                },
            );
            applied += 1;
        }
        applied
    }

    fn drain_pending(&self, book: &mut PriceBook) -> usize {
        let pending = std::mem::take(&mut *self.pending.lock());
        Self::apply_updates(book, pending)
    }

    fn count_items(book: &PriceBook) -> usize {
        book.values().map(|snapshot| snapshot.prices.len()).sum()
    }

    /// Persist the current book to the configured snapshot path.
    pub fn save_to_disk(&self) -> Result<()> {
        let snapshot = PersistedSnapshot {
            cache: self.book.read().clone(),
            last_refresh: *self.last_refresh.read(),
            saved_at: Utc::now(),
        };
        snapshot.write_atomic(&self.config.snapshot_path)?;
        debug!(path = %self.config.snapshot_path.display(), "Snapshot persisted");
        Ok(())
    }

    /// Warm-start from the persisted snapshot, if one exists.
    ///
    /// Returns `Ok(false)` on a cold start (no snapshot file).
    pub fn load_from_disk(&self) -> Result<bool> {
        let Some(snapshot) = PersistedSnapshot::read(&self.config.snapshot_path)? else {
            return Ok(false);
        };

        {
            let mut book = self.book.write();
            *book = snapshot.cache;
            self.market_count.store(book.len(), Ordering::Relaxed);
            self.item_count
                .store(Self::count_items(&book), Ordering::Relaxed);
            self.set_state(CacheState::Ready);
        }
        *self.last_refresh.write() = snapshot.last_refresh;

        info!(
            markets = self.market_count.load(Ordering::Relaxed),
            prices = self.item_count.load(Ordering::Relaxed),
            "Warm start from persisted snapshot"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_book(book: PriceBook) -> PriceCache {
        let dir = std::env::temp_dir().join("pricehub-unit-unused.json");
        let cache = PriceCache::new(CacheConfig {
            snapshot_path: dir,
            ..CacheConfig::default()
        });
        {
            let mut served = cache.book.write();
            *served = book;
            cache
                .market_count
                .store(served.len(), Ordering::Relaxed);
            cache
                .item_count
                .store(PriceCache::count_items(&served), Ordering::Relaxed);
            cache.set_state(CacheState::Ready);
        }
        cache
    }

    fn one_market_book() -> PriceBook {
        let mut prices = HashMap::new();
        prices.insert(
            VariantId::normalize("11"),
            PriceEntry {
                price: "99.99".into(),
                compare_at_price: None,
                currency: "EUR".into(),
            },
        );
        let mut book = PriceBook::new();
        book.insert(
            "France".to_string(),
            MarketSnapshot {
                market_id: "gid://shopify/Market/1".into(),
                currency: "EUR".into(),
                price_list_id: "gid://shopify/PriceList/10".into(),
                prices,
            },
        );
        book
    }

    #[test]
    fn lookup_accepts_both_identifier_shapes() {
        let cache = cache_with_book(one_market_book());
        assert!(cache.lookup("France", "11").is_some());
        assert!(cache
            .lookup("France", "gid://shopify/ProductVariant/11")
            .is_some());
        assert!(cache.lookup("France", "12").is_none());
        assert!(cache.lookup("Espagne", "11").is_none());
    }

    #[test]
    fn patch_normalizes_identifiers() {
        let cache = cache_with_book(one_market_book());
        let applied = cache.patch(vec![PriceUpdate {
            market: "France".into(),
            variant_id: VariantId::normalize("gid://shopify/ProductVariant/11"),
            price: "89.99".into(),
            compare_at_price: Some("129.99".into()),
        }]);
        assert_eq!(applied, 1);

        let entry = cache.lookup("France", "11").unwrap();
        assert_eq!(entry.price, "89.99");
        assert_eq!(entry.compare_at_price.as_deref(), Some("129.99"));
    }

    #[test]
    fn patch_skips_absent_market() {
        let cache = cache_with_book(one_market_book());
        let applied = cache.patch(vec![PriceUpdate {
            market: "Atlantis".into(),
            variant_id: VariantId::normalize("11"),
            price: "1.00".into(),
            compare_at_price: None,
        }]);
        assert_eq!(applied, 0);
    }

    #[test]
    fn lookup_batch_omits_markets_without_hits() {
        let cache = cache_with_book(one_market_book());
        let found = cache.lookup_batch(
            &[VariantId::normalize("11"), VariantId::normalize("404")],
            &["France".to_string(), "Espagne".to_string()],
        );
        assert_eq!(found.len(), 1);
        let snapshot = &found["France"];
        assert_eq!(snapshot.prices.len(), 1);
        assert_eq!(snapshot.currency, "EUR");
    }

    #[test]
    fn status_starts_empty() {
        let cache = PriceCache::new(CacheConfig::default());
        let status = cache.status();
        assert_eq!(status.state, CacheState::Empty);
        assert_eq!(status.market_count, 0);
        assert_eq!(status.total_item_count, 0);
        assert!(status.last_refresh.is_none());
    }

    #[test]
    fn invalid_amounts_are_rejected() {
        assert!(PriceCache::valid_amount("0"));
        assert!(PriceCache::valid_amount("99.99"));
        assert!(!PriceCache::valid_amount("-1"));
        assert!(!PriceCache::valid_amount("abc"));
    }

    #[test]
    fn route_exposes_price_list_id() {
        let cache = cache_with_book(one_market_book());
        let route = cache.route("France").unwrap();
        assert_eq!(route.price_list_id, "gid://shopify/PriceList/10");
        assert_eq!(route.currency, "EUR");
        assert!(cache.route("Espagne").is_none());
    }
}
