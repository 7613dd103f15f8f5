//! Serde types for the GraphQL Admin API wire format.

use serde::Deserialize;

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// Cursor-paginated connection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
    pub cursor: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
}

// --- markets enumeration ---

#[derive(Debug, Deserialize)]
pub struct MarketsData {
    pub markets: Connection<MarketNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketNode {
    pub id: String,
    pub name: String,
    /// Absent for markets without a dedicated price list.
    pub price_list: Option<PriceListRef>,
}

#[derive(Debug, Deserialize)]
pub struct PriceListRef {
    pub id: String,
    pub currency: String,
}

// --- price-list pagination ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceListData {
    pub price_list: Option<PriceListNode>,
}

#[derive(Debug, Deserialize)]
pub struct PriceListNode {
    pub prices: Connection<PriceNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceNode {
    pub variant: VariantRef,
    pub price: Money,
    pub compare_at_price: Option<CompareAtMoney>,
}

#[derive(Debug, Deserialize)]
pub struct VariantRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: String,
    pub currency_code: String,
}

/// `compareAtPrice` carries only the amount we need.
#[derive(Debug, Deserialize)]
pub struct CompareAtMoney {
    pub amount: String,
}

// --- fixed-price writes ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedPricesAddData {
    pub price_list_fixed_prices_add: FixedPricesAddPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedPricesAddPayload {
    #[serde(default)]
    pub prices: Vec<WrittenPrice>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
pub struct WrittenPrice {
    pub variant: VariantRef,
}

#[derive(Debug, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}
