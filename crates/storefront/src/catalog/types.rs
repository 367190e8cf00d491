//! Wire types for the upstream product catalog.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One upstream catalog partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKey {
    /// A named product category, e.g. `smartphones`.
    Category(String),
    /// The unfiltered product list, capped at `limit` items.
    All { limit: u32 },
}

impl EndpointKey {
    #[must_use]
    pub fn category(slug: impl Into<String>) -> Self {
        Self::Category(slug.into())
    }

    /// Path and query relative to the catalog base URL.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Category(slug) => format!("products/category/{slug}"),
            Self::All { limit } => format!("products?limit={limit}"),
        }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(slug) => f.write_str(slug),
            Self::All { limit } => write!(f, "all(limit={limit})"),
        }
    }
}

/// Upstream list response: `{ "products": [...], "total": .. }`.
///
/// Records are kept undecoded so one malformed record cannot fail the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub products: Vec<serde_json::Value>,
}

impl CatalogPage {
    /// Decode every record on its own. Records that do not decode are logged
    /// and skipped.
    #[must_use]
    pub fn into_records(self) -> Vec<RawProduct> {
        self.products
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<RawProduct>(value) {
                Ok(raw) => Some(raw),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable product");
                    None
                }
            })
            .collect()
    }
}

/// Image field as sent upstream: a single URL or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawImages {
    One(String),
    Many(Vec<String>),
}

impl RawImages {
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(url) => vec![url],
            Self::Many(urls) => urls,
        }
    }
}

/// A product record exactly as the upstream returns it. Unknown fields are
/// ignored, and `null` is accepted wherever a field may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawProduct {
    pub id: i32,
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Option<RawImages>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}
