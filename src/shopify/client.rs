//! Shopify GraphQL Admin API client.
//!
//! All traffic goes through a single `POST /graphql.json` endpoint; the
//! documents below cover market enumeration, price-list pagination and the
//! `priceListFixedPricesAdd` write mutation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::ShopifyConfig;
use crate::error::{Error, Result};

use super::dto::{FixedPricesAddData, GraphQlResponse, MarketsData, PriceListData};
use super::traits::{
    MarketListing, PriceListEntry, PriceListPage, PriceListSource, PriceWrite, WriteOutcome,
};

/// Markets per enumeration page.
const MARKETS_PAGE_SIZE: u32 = 50;

/// Backoff between retry attempts.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

const MARKETS_QUERY: &str = r#"
query MarketsWithPriceLists($first: Int!, $after: String) {
    markets(first: $first, after: $after) {
        edges {
            node {
                id
                name
                priceList {
                    id
                    currency
                }
            }
            cursor
        }
        pageInfo {
            hasNextPage
        }
    }
}
"#;

const PRICE_LIST_QUERY: &str = r#"
query PriceListPage($priceListId: ID!, $first: Int!, $after: String) {
    priceList(id: $priceListId) {
        prices(first: $first, after: $after) {
            edges {
                node {
                    variant { id }
                    price { amount currencyCode }
                    compareAtPrice { amount }
                }
                cursor
            }
            pageInfo { hasNextPage }
        }
    }
}
"#;

const FIXED_PRICES_ADD_MUTATION: &str = r#"
mutation FixedPricesAdd($priceListId: ID!, $prices: [PriceListPriceInput!]!) {
    priceListFixedPricesAdd(priceListId: $priceListId, prices: $prices) {
        prices {
            variant { id }
        }
        userErrors {
            field
            message
        }
    }
}
"#;

/// HTTP client for the Shopify GraphQL Admin API.
pub struct ShopifyClient {
    http: HttpClient,
    graphql_url: String,
    access_token: String,
    page_size: u32,
    retry_max_attempts: u32,
}

impl ShopifyClient {
    /// Build a client from the `[shopify]` config section.
    ///
    /// `page_size` bounds price-list pages (platform limit 250).
    #[must_use]
    pub fn new(config: &ShopifyConfig, page_size: u32) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            graphql_url: format!(
                "https://{}/admin/api/{}/graphql.json",
                config.shop_domain, config.api_version
            ),
            access_token: config.access_token.clone(),
            page_size: page_size.min(250),
            retry_max_attempts: config.retry_max_attempts,
        }
    }

    /// Execute a GraphQL document with bounded retry on transport failures.
    async fn execute<T>(&self, operation: &'static str, query: &str, variables: Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let payload = json!({ "query": query, "variables": variables });
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let response = self
                .http
                .post(&self.graphql_url)
                .header("X-Shopify-Access-Token", &self.access_token)
                .json(&payload)
                .send()
                .await;

            let response = match response {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(operation, attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let response = response.error_for_status()?;
            let parsed: GraphQlResponse<T> = response.json().await?;

            if !parsed.errors.is_empty() {
                return Err(Error::Platform {
                    operation,
                    errors: parsed.errors.into_iter().map(|e| e.message).collect(),
                });
            }

            return parsed.data.ok_or(Error::Platform {
                operation,
                errors: vec!["response carried no data".to_string()],
            });
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(
        &self,
        operation: &'static str,
        attempt: u32,
        max_attempts: u32,
        err: &reqwest::Error,
    ) {
        warn!(
            operation,
            attempt,
            max_attempts,
            error = %err,
            "GraphQL request failed, retrying"
        );
        sleep(RETRY_BACKOFF).await;
    }
}

#[async_trait]
impl PriceListSource for ShopifyClient {
    async fn list_markets(&self) -> Result<Vec<MarketListing>> {
        let mut listings = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let variables = json!({
                "first": MARKETS_PAGE_SIZE,
                "after": cursor,
            });
            let data: MarketsData = self.execute("markets", MARKETS_QUERY, variables).await?;

            let page = data.markets;
            for edge in &page.edges {
                cursor = Some(edge.cursor.clone());
            }
            for edge in page.edges {
                let node = edge.node;
                // Markets without a price list have no prices to cache.
                if let Some(price_list) = node.price_list {
                    listings.push(MarketListing {
                        market_id: node.id,
                        name: node.name,
                        price_list_id: price_list.id,
                        currency: price_list.currency,
                    });
                }
            }

            if !page.page_info.has_next_page {
                break;
            }
        }

        debug!(count = listings.len(), "Enumerated markets with price lists");
        Ok(listings)
    }

    async fn price_list_page(
        &self,
        price_list_id: &str,
        cursor: Option<&str>,
    ) -> Result<PriceListPage> {
        let variables = json!({
            "priceListId": price_list_id,
            "first": self.page_size,
            "after": cursor,
        });
        let data: PriceListData = self
            .execute("priceListPage", PRICE_LIST_QUERY, variables)
            .await?;

        let Some(price_list) = data.price_list else {
            return Err(Error::Platform {
                operation: "priceListPage",
                errors: vec![format!("price list '{price_list_id}' not found")],
            });
        };

        let has_next = price_list.prices.page_info.has_next_page;
        let mut last_cursor = None;
        let mut entries = Vec::with_capacity(price_list.prices.edges.len());
        for edge in price_list.prices.edges {
            last_cursor = Some(edge.cursor);
            entries.push(PriceListEntry {
                variant_id: edge.node.variant.id,
                price: edge.node.price.amount,
                compare_at_price: edge.node.compare_at_price.map(|c| c.amount),
                currency: edge.node.price.currency_code,
            });
        }

        Ok(PriceListPage {
            entries,
            next_cursor: if has_next { last_cursor } else { None },
        })
    }

    async fn write_prices(
        &self,
        price_list_id: &str,
        writes: &[PriceWrite],
    ) -> Result<WriteOutcome> {
        let prices: Vec<Value> = writes
            .iter()
            .map(|write| {
                let mut input = json!({
                    "variantId": write.variant_id.to_gid(),
                    "price": {
                        "amount": write.price,
                        "currencyCode": write.currency,
                    },
                });
                if let Some(compare_at) = &write.compare_at_price {
                    input["compareAtPrice"] = json!({
                        "amount": compare_at,
                        "currencyCode": write.currency,
                    });
                }
                input
            })
            .collect();

        let variables = json!({
            "priceListId": price_list_id,
            "prices": prices,
        });
        let data: FixedPricesAddData = self
            .execute("fixedPricesAdd", FIXED_PRICES_ADD_MUTATION, variables)
            .await?;

        let payload = data.price_list_fixed_prices_add;
        let outcome = WriteOutcome {
            succeeded: payload.prices.len(),
            errors: payload
                .user_errors
                .into_iter()
                .map(|e| match e.field {
                    Some(field) => format!("{}: {}", field.join("."), e.message),
                    None => e.message,
                })
                .collect(),
        };

        debug!(
            price_list_id,
            succeeded = outcome.succeeded,
            rejected = outcome.errors.len(),
            "Wrote fixed prices"
        );
        Ok(outcome)
    }
}
