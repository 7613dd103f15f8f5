//! App orchestration module.
//!
//! Wires the price cache to the Shopify client and keeps the cache warm:
//! an optional warm start from the persisted snapshot, an initial refresh
//! in the background, then a periodic refresh loop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::cache::PriceCache;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::shopify::ShopifyClient;

/// Main application struct.
pub struct App;

impl App {
    /// Run the cache daemon until cancelled.
    ///
    /// Startup never blocks on the platform: a persisted snapshot (if any)
    /// is served immediately and the first refresh runs in the background.
    pub async fn run(config: Config) -> Result<()> {
        let client = Arc::new(ShopifyClient::new(&config.shopify, config.cache.page_size));
        let cache = Arc::new(PriceCache::new(config.cache.clone()));

        match cache.load_from_disk() {
            Ok(true) => {
                let status = cache.status();
                info!(
                    markets = status.market_count,
                    prices = status.total_item_count,
                    "Serving persisted snapshot while the first refresh runs"
                );
            }
            Ok(false) => info!("No persisted snapshot, cold start"),
            Err(e) => warn!(error = %e, "Persisted snapshot unreadable, cold start"),
        }

        Self::spawn_refresh(cache.clone(), client.clone());

        let mut interval =
            tokio::time::interval(Duration::from_secs(config.cache.refresh_interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; the initial refresh already runs.
        interval.tick().await;

        loop {
            interval.tick().await;
            Self::spawn_refresh(cache.clone(), client.clone());
        }
    }

    /// Run a refresh without blocking the interval loop.
    fn spawn_refresh(cache: Arc<PriceCache>, client: Arc<ShopifyClient>) {
        tokio::spawn(async move {
            match cache.refresh(client.as_ref()).await {
                Ok(report) => {
                    for (market, reason) in &report.failed {
                        warn!(market = %market, reason = %reason, "Market missing from refresh");
                    }
                }
                Err(Error::RefreshAlreadyInProgress) => {
                    info!("Previous refresh still running, skipping this cycle");
                }
                Err(e) => {
                    warn!(error = %e, "Refresh failed, serving previous prices");
                }
            }
        });
    }
}
