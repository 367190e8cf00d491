//! Product catalog: category table, endpoint mapping, and fetching.
//!
//! # Flow
//!
//! 1. [`mapper::select_endpoints`] turns a category and its applied filters
//!    into endpoint keys using the [`CatalogTable`].
//! 2. [`fetch_category_products`] requests every endpoint concurrently and
//!    waits for all of them. Any failure fails the whole batch.
//! 3. [`mapper::normalize_pages`] flattens the pages in endpoint order and
//!    stamps each product with the requesting category.
//!
//! # Example
//!
//! ```rust,ignore
//! let table = CatalogTable::standard(20)?;
//! let client = CatalogClient::new(reqwest::Client::new(), &base_url);
//! let phones = fetch_category_products(&client, &table, CategoryId::new(1), &applied).await?;
//! ```

pub mod client;
pub mod mapper;
pub mod table;
pub mod types;

use std::future::Future;

use futures::future::try_join_all;
use thiserror::Error;
use tracing::instrument;

use pazar_core::{CategoryId, Product};

pub use client::CatalogClient;
pub use table::{CatalogTable, CategoryEntry, FilterEntry, TableError};
pub use types::{EndpointKey, RawProduct};

use crate::store::filters::FilterOption;

/// Errors from fetching a catalog endpoint.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the body could not be read.
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The catalog answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The response body was not a product page.
    #[error("could not parse {endpoint} response: {source}")]
    Parse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The endpoint could not be turned into a URL.
    #[error("invalid URL for {endpoint}: {reason}")]
    InvalidUrl { endpoint: String, reason: String },
}

/// Something that can return the raw records behind one endpoint key.
pub trait CatalogSource: Send + Sync {
    fn fetch_endpoint(
        &self,
        key: &EndpointKey,
    ) -> impl Future<Output = Result<Vec<RawProduct>, CatalogError>> + Send;
}

/// Fetch and normalize the products for a category under `filters`.
///
/// # Errors
///
/// Returns the first [`CatalogError`] if any endpoint request fails; no
/// partial list is returned.
#[instrument(skip(source, table, filters), fields(category = %category_id))]
pub async fn fetch_category_products<S: CatalogSource>(
    source: &S,
    table: &CatalogTable,
    category_id: CategoryId,
    filters: &[FilterOption],
) -> Result<Vec<Product>, CatalogError> {
    let endpoints = mapper::select_endpoints(table, category_id, filters);
    tracing::debug!(endpoints = ?endpoints, "Selected catalog endpoints");

    let pages = try_join_all(endpoints.iter().map(|key| source.fetch_endpoint(key))).await?;

    let category = table.category_or_fallback(category_id);
    let products = mapper::normalize_pages(pages, &category);
    tracing::info!(count = products.len(), "Fetched category products");
    Ok(products)
}
