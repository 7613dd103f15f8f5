//! Commerce-platform collaborator.
//!
//! The cache and write-back paths only ever see the [`PriceListSource`]
//! trait; [`ShopifyClient`] is the production implementation over the
//! GraphQL Admin API. Tests substitute a scripted in-memory source.

mod client;
mod dto;
mod traits;

pub use client::ShopifyClient;
pub use traits::{
    MarketListing, PriceListEntry, PriceListPage, PriceListSource, PriceWrite, WriteOutcome,
};
