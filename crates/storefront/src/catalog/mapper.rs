//! Category and filter selection to endpoint keys, and raw records to
//! product snapshots. Everything here is pure.

use pazar_core::{Category, CategoryId, ImageList, Price, Product, ProductId};
use thiserror::Error;

use crate::catalog::table::CatalogTable;
use crate::catalog::types::{EndpointKey, RawImages, RawProduct};
use crate::store::filters::{ALL_FILTER_NAME, FilterOption};

/// Why a raw record was rejected at ingestion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("product {0} has a negative price")]
    NegativePrice(i32),
    #[error("product {0} has no images")]
    NoImages(i32),
}

/// Endpoints to query for `category_id` under `selected`.
///
/// An empty selection, or one containing the "all" option, yields the
/// category's full endpoint list. Otherwise each selected filter contributes
/// its endpoints in selection order, de-duplicated. Unknown categories use
/// the table's fallback endpoint.
#[must_use]
pub fn select_endpoints(
    table: &CatalogTable,
    category_id: CategoryId,
    selected: &[FilterOption],
) -> Vec<EndpointKey> {
    let Some(category) = table.get(category_id) else {
        return vec![table.fallback_endpoint()];
    };

    let show_all = selected.is_empty()
        || selected
            .iter()
            .any(|f| f.is_all() || f.name == ALL_FILTER_NAME);
    if show_all {
        return category.endpoint_keys();
    }

    let mut keys: Vec<EndpointKey> = Vec::new();
    for filter in selected {
        let Some(mapping) = category.filter_by_name(&filter.name) else {
            continue;
        };
        for endpoint in &mapping.endpoints {
            let key = EndpointKey::category(endpoint.as_str());
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys
}

/// Convert one upstream record into a snapshot stamped with `category`.
///
/// A single image string becomes a one-element list, and an empty image
/// list falls back to the thumbnail.
///
/// # Errors
///
/// Returns an [`IngestError`] when the record has a negative price or no
/// usable image.
pub fn normalize(raw: RawProduct, category: &Category) -> Result<Product, IngestError> {
    let price = Price::new(raw.price).map_err(|_| IngestError::NegativePrice(raw.id))?;

    let images = ImageList::new(raw.images.map(RawImages::into_vec).unwrap_or_default())
        .or_else(|_| ImageList::single(raw.thumbnail.unwrap_or_default()))
        .map_err(|_| IngestError::NoImages(raw.id))?;

    Ok(Product {
        id: ProductId::new(raw.id),
        title: raw.title,
        price,
        description: raw.description.unwrap_or_default(),
        images,
        category: category.clone(),
    })
}

/// Flatten per-endpoint pages in order and normalize every record. Records
/// that fail ingestion are logged and skipped.
#[must_use]
pub fn normalize_pages(pages: Vec<Vec<RawProduct>>, category: &Category) -> Vec<Product> {
    pages
        .into_iter()
        .flatten()
        .filter_map(|raw| match normalize(raw, category) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(error = %e, category = %category.id, "Skipping malformed product");
                None
            }
        })
        .collect()
}

/// Products whose title contains `query`, case-insensitively.
#[must_use]
pub fn search_products(products: &[Product], query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
