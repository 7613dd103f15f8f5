use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;

/// Environment variable that overrides `[shopify] access_token`.
pub const ACCESS_TOKEN_ENV: &str = "SHOPIFY_ACCESS_TOKEN";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub shopify: ShopifyConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Shopify GraphQL Admin API connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyConfig {
    /// Shop domain, e.g. `my-shop.myshopify.com`.
    pub shop_domain: String,
    /// Admin API access token. Prefer the `SHOPIFY_ACCESS_TOKEN` env var
    /// over committing the token to the config file.
    #[serde(default)]
    pub access_token: String,
    /// Admin API version segment.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Per-request deadline in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// TCP connect deadline in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Attempts per request for timeout/connect failures.
    #[serde(default = "default_retry_attempts")]
    pub retry_max_attempts: u32,
}

/// Price cache behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Where the persisted snapshot lives.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    /// Page size for price-list pagination. Capped by the platform at 250.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// How many markets are fetched in parallel during a refresh.
    #[serde(default = "default_market_concurrency")]
    pub market_concurrency: usize,
    /// Deadline for one market's full pagination, in seconds. A market that
    /// exceeds it is dropped from the refresh, not fatal.
    #[serde(default = "default_market_timeout_secs")]
    pub market_timeout_secs: u64,
    /// Interval between background refreshes, in seconds.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

/// Default pricing-operation parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Base adjustment applied on the VAT path, e.g. -0.12 for -12%.
    #[serde(default = "default_base_adjustment")]
    pub base_adjustment: Decimal,
    /// Displayed discount target in (0, 1).
    #[serde(default = "default_discount_target")]
    pub discount_target: Decimal,
}

fn default_api_version() -> String {
    "2024-10".into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("price_cache.json")
}

fn default_page_size() -> u32 {
    250
}

fn default_market_concurrency() -> usize {
    4
}

fn default_market_timeout_secs() -> u64 {
    300
}

fn default_refresh_interval_secs() -> u64 {
    6 * 3600
}

fn default_base_adjustment() -> Decimal {
    dec!(-0.12)
}

fn default_discount_target() -> Decimal {
    dec!(0.40)
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            page_size: default_page_size(),
            market_concurrency: default_market_concurrency(),
            market_timeout_secs: default_market_timeout_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_adjustment: default_base_adjustment(),
            discount_target: default_discount_target(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, apply environment overrides and
    /// validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file: {e}")))?;

        let mut config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {e}")))?;

        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            config.shopify.access_token = token;
        }

        config.validate()?;

        Ok(config)
    }

    /// Initialize the tracing subscriber from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    fn validate(&self) -> Result<()> {
        if self.shopify.shop_domain.is_empty() {
            return Err(Error::Config("shop_domain cannot be empty".into()));
        }
        if self.shopify.access_token.is_empty() {
            return Err(Error::Config(format!(
                "access_token is empty; set it in the config file or via {ACCESS_TOKEN_ENV}"
            )));
        }
        if self.cache.page_size == 0 || self.cache.page_size > 250 {
            return Err(Error::Config(
                "cache.page_size must be in 1..=250".into(),
            ));
        }
        if self.cache.market_concurrency == 0 {
            return Err(Error::Config(
                "cache.market_concurrency must be at least 1".into(),
            ));
        }
        if self.pricing.discount_target <= Decimal::ZERO
            || self.pricing.discount_target >= Decimal::ONE
        {
            return Err(Error::Config(
                "pricing.discount_target must be in (0, 1)".into(),
            ));
        }
        Ok(())
    }
}
