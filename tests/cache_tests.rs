//! Integration tests for the price cache refresh lifecycle.

mod support;

use std::sync::Arc;
use std::time::Duration;

use pricehub::cache::PriceCache;
use pricehub::config::CacheConfig;
use pricehub::domain::{CacheState, PriceUpdate, VariantId};
use pricehub::error::Error;
use pricehub::shopify::{PriceListSource, PriceWrite};

use support::{entry, listing, ScriptedSource};

fn test_config(dir: &tempfile::TempDir) -> CacheConfig {
    CacheConfig {
        snapshot_path: dir.path().join("price_cache.json"),
        market_timeout_secs: 5,
        ..CacheConfig::default()
    }
}

fn two_market_source() -> ScriptedSource {
    ScriptedSource::new()
        .with_market(
            listing("France", 1, "EUR"),
            vec![
                vec![
                    entry("gid://shopify/ProductVariant/11", "99.99", Some("159.99"), "EUR"),
                    entry("gid://shopify/ProductVariant/12", "49.99", None, "EUR"),
                ],
                vec![entry("gid://shopify/ProductVariant/13", "19.99", None, "EUR")],
            ],
        )
        .with_market(
            listing("Hongrie", 2, "HUF"),
            vec![vec![entry("gid://shopify/ProductVariant/11", "35990", None, "HUF")]],
        )
}

#[tokio::test]
async fn refresh_builds_the_full_book() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PriceCache::new(test_config(&dir));
    let source = two_market_source();

    let report = cache.refresh(&source).await.unwrap();

    assert_eq!(report.markets_loaded, 2);
    assert_eq!(report.total_prices, 4);
    assert!(report.failed.is_empty());

    let status = cache.status();
    assert_eq!(status.state, CacheState::Ready);
    assert_eq!(status.market_count, 2);
    assert_eq!(status.total_item_count, 4);
    assert!(status.last_refresh.is_some());

    // Both identifier shapes resolve, pagination included everything.
    assert_eq!(cache.lookup("France", "11").unwrap().price, "99.99");
    assert_eq!(
        cache
            .lookup("France", "gid://shopify/ProductVariant/13")
            .unwrap()
            .price,
        "19.99"
    );
    assert_eq!(cache.lookup("Hongrie", "11").unwrap().currency, "HUF");
    // One page request per scripted page: two for France, one for Hongrie.
    assert_eq!(source.page_calls(), 3);
}

#[tokio::test]
async fn failed_market_is_dropped_but_refresh_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PriceCache::new(test_config(&dir));
    let source = two_market_source().fail_list("gid://shopify/PriceList/2");

    let report = cache.refresh(&source).await.unwrap();

    assert_eq!(report.markets_loaded, 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "Hongrie");

    assert_eq!(cache.state(), CacheState::Ready);
    assert!(cache.lookup("France", "11").is_some());
    assert!(cache.lookup("Hongrie", "11").is_none());
}

#[tokio::test]
async fn enumeration_failure_keeps_the_previous_book() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PriceCache::new(test_config(&dir));

    cache.refresh(&two_market_source()).await.unwrap();

    let broken = ScriptedSource::new().fail_enumeration();
    let err = cache.refresh(&broken).await.unwrap_err();
    assert!(matches!(err, Error::EnumerationFailed(_)));

    // The old book is still served and the state rolled back.
    assert_eq!(cache.state(), CacheState::Ready);
    assert_eq!(cache.lookup("France", "11").unwrap().price, "99.99");
}

#[tokio::test]
async fn concurrent_refresh_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(PriceCache::new(test_config(&dir)));
    let slow = Arc::new(two_market_source().with_page_delay(Duration::from_millis(200)));

    let background = {
        let cache = cache.clone();
        let slow = slow.clone();
        tokio::spawn(async move { cache.refresh(slow.as_ref()).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = cache.refresh(&two_market_source()).await.unwrap_err();
    assert!(matches!(err, Error::RefreshAlreadyInProgress));

    let report = background.await.unwrap().unwrap();
    assert_eq!(report.markets_loaded, 2);
}

#[tokio::test]
async fn patch_during_refresh_lands_on_the_new_book() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(PriceCache::new(test_config(&dir)));

    // Seed a book so the patch has a target either way.
    cache.refresh(&two_market_source()).await.unwrap();

    let slow = Arc::new(two_market_source().with_page_delay(Duration::from_millis(200)));
    let background = {
        let cache = cache.clone();
        let slow = slow.clone();
        tokio::spawn(async move { cache.refresh(slow.as_ref()).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(cache.state(), CacheState::Loading);

    let queued = cache.patch(vec![PriceUpdate {
        market: "France".to_string(),
        variant_id: VariantId::normalize("11"),
        price: "89.99".to_string(),
        compare_at_price: Some("149.99".to_string()),
    }]);
    assert_eq!(queued, 1);

    background.await.unwrap().unwrap();

    // The queued patch won over the value the refresh fetched.
    let patched = cache.lookup("France", "gid://shopify/ProductVariant/11").unwrap();
    assert_eq!(patched.price, "89.99");
    assert_eq!(patched.compare_at_price.as_deref(), Some("149.99"));
}

#[tokio::test]
async fn lookups_during_refresh_see_old_or_new_never_a_mix() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(PriceCache::new(test_config(&dir)));
    cache.refresh(&two_market_source()).await.unwrap();

    // Same markets, but the refresh changes a known key so a torn or mixed
    // read is distinguishable from both books.
    let updated = Arc::new(
        ScriptedSource::new()
            .with_market(
                listing("France", 1, "EUR"),
                vec![vec![entry("11", "89.99", None, "EUR")]],
            )
            .with_market(
                listing("Hongrie", 2, "HUF"),
                vec![vec![entry("11", "34990", None, "HUF")]],
            )
            .with_page_delay(Duration::from_millis(50)),
    );

    let reader = {
        let cache = cache.clone();
        tokio::spawn(async move {
            loop {
                let france = cache.lookup("France", "11").unwrap().price;
                assert!(
                    france == "99.99" || france == "89.99",
                    "observed a value from neither book: {france}"
                );
                let hungary = cache.lookup("Hongrie", "11").unwrap().price;
                assert!(
                    hungary == "35990" || hungary == "34990",
                    "observed a value from neither book: {hungary}"
                );
                // The swap is a single assignment, so once one market shows
                // the new book, every market must.
                if france == "89.99" {
                    assert_eq!(hungary, "34990");
                    break;
                }
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
    };

    cache.refresh(updated.as_ref()).await.unwrap();
    reader.await.unwrap();

    assert_eq!(cache.lookup("France", "11").unwrap().price, "89.99");
}

#[tokio::test]
async fn refresh_persists_a_snapshot_for_warm_start() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let cache = PriceCache::new(config.clone());
    cache.refresh(&two_market_source()).await.unwrap();

    // A new process loads the snapshot and serves it immediately.
    let restarted = PriceCache::new(config);
    assert!(restarted.load_from_disk().unwrap());

    let status = restarted.status();
    assert_eq!(status.state, CacheState::Ready);
    assert_eq!(status.market_count, 2);
    assert_eq!(status.total_item_count, 4);
    assert!(status.last_refresh.is_some());
    assert_eq!(restarted.lookup("France", "13").unwrap().price, "19.99");
}

#[tokio::test]
async fn lookup_batch_filters_markets_and_variants() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PriceCache::new(test_config(&dir));
    cache.refresh(&two_market_source()).await.unwrap();

    let found = cache.lookup_batch(
        &[
            VariantId::normalize("gid://shopify/ProductVariant/11"),
            VariantId::normalize("404"),
        ],
        &["France".to_string(), "Hongrie".to_string(), "Atlantis".to_string()],
    );

    assert_eq!(found.len(), 2);
    assert_eq!(found["France"].prices.len(), 1);
    assert_eq!(found["Hongrie"].prices.len(), 1);
    assert!(!found.contains_key("Atlantis"));
}

#[tokio::test]
async fn write_back_then_patch_updates_the_served_price() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PriceCache::new(test_config(&dir));
    let source = two_market_source();
    cache.refresh(&source).await.unwrap();

    // Push the new price to the platform via the market's price list.
    let route = cache.route("France").unwrap();
    let writes = vec![PriceWrite {
        variant_id: VariantId::normalize("gid://shopify/ProductVariant/11"),
        price: "79.99".to_string(),
        compare_at_price: Some("129.99".to_string()),
        currency: route.currency.clone(),
    }];
    let outcome = source.write_prices(&route.price_list_id, &writes).await.unwrap();
    assert_eq!(outcome.succeeded, 1);
    assert!(outcome.errors.is_empty());

    let recorded = source.recorded_writes();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].price, "79.99");

    // Then patch the cache so lookups serve the written price immediately.
    let applied = cache.patch(vec![PriceUpdate {
        market: "France".to_string(),
        variant_id: VariantId::normalize("11"),
        price: "79.99".to_string(),
        compare_at_price: Some("129.99".to_string()),
    }]);
    assert_eq!(applied, 1);

    let entry = cache.lookup("France", "11").unwrap();
    assert_eq!(entry.price, "79.99");
    assert_eq!(entry.compare_at_price.as_deref(), Some("129.99"));
}

#[tokio::test]
async fn invalid_prices_are_skipped_during_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PriceCache::new(test_config(&dir));
    let source = ScriptedSource::new().with_market(
        listing("France", 1, "EUR"),
        vec![vec![
            entry("11", "99.99", None, "EUR"),
            entry("12", "-5.00", None, "EUR"),
            entry("13", "not-a-price", None, "EUR"),
        ]],
    );

    let report = cache.refresh(&source).await.unwrap();

    assert_eq!(report.total_prices, 1);
    assert!(cache.lookup("France", "11").is_some());
    assert!(cache.lookup("France", "12").is_none());
    assert!(cache.lookup("France", "13").is_none());
}
