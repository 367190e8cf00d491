//! Declarative category table.
//!
//! Maps each category to its full endpoint list and each of its specific
//! filters to the endpoints that filter narrows to. The table is validated
//! once on construction so that lookups never have to handle gaps.

use std::collections::HashSet;

use thiserror::Error;

use pazar_core::{Category, CategoryId, FilterId};

use crate::catalog::types::EndpointKey;
use crate::store::filters::FilterSelection;

/// Name stamped on products fetched for an unknown category.
pub const FALLBACK_CATEGORY_NAME: &str = "Tüm Ürünler";

/// Errors found while validating a [`CatalogTable`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("category {0} is defined more than once")]
    DuplicateCategory(CategoryId),
    #[error("category {0} has no endpoints")]
    NoEndpoints(CategoryId),
    #[error("category {category}: filter id {filter} is reserved or repeated")]
    InvalidFilterId { category: CategoryId, filter: FilterId },
    #[error("category {category}: filter name {name:?} is repeated")]
    DuplicateFilterName { category: CategoryId, name: String },
    #[error("category {category}: filter {name:?} has no endpoints")]
    EmptyFilter { category: CategoryId, name: String },
    #[error("category {category}: filter {name:?} uses endpoint {endpoint} outside the category")]
    ForeignEndpoint {
        category: CategoryId,
        name: String,
        endpoint: String,
    },
    #[error("category {category}: endpoint {endpoint} is not reachable through any filter")]
    UncoveredEndpoint { category: CategoryId, endpoint: String },
}

/// A specific (non-"all") filter and the endpoints it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEntry {
    pub id: FilterId,
    pub name: String,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub id: CategoryId,
    pub name: String,
    /// Queried when no specific filter is selected, in this order.
    pub endpoints: Vec<String>,
    pub filters: Vec<FilterEntry>,
}

impl CategoryEntry {
    #[must_use]
    pub fn category(&self) -> Category {
        Category::new(self.id, self.name.clone())
    }

    /// The full endpoint list as keys.
    #[must_use]
    pub fn endpoint_keys(&self) -> Vec<EndpointKey> {
        self.endpoints.iter().map(EndpointKey::category).collect()
    }

    /// A fresh filter selection with "all" selected.
    #[must_use]
    pub fn filter_selection(&self) -> FilterSelection {
        FilterSelection::new(self.filters.iter().map(|f| (f.id, f.name.as_str())))
    }

    #[must_use]
    pub fn filter_by_name(&self, name: &str) -> Option<&FilterEntry> {
        self.filters.iter().find(|f| f.name == name)
    }
}

/// Validated category table.
#[derive(Debug, Clone)]
pub struct CatalogTable {
    categories: Vec<CategoryEntry>,
    fallback_limit: u32,
}

impl CatalogTable {
    /// Validate and build a table.
    ///
    /// # Errors
    ///
    /// Returns the first [`TableError`] found.
    pub fn new(categories: Vec<CategoryEntry>, fallback_limit: u32) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.id) {
                return Err(TableError::DuplicateCategory(category.id));
            }
            validate_category(category)?;
        }
        Ok(Self {
            categories,
            fallback_limit,
        })
    }

    /// The six storefront categories.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] only if the built-in definitions are broken.
    pub fn standard(fallback_limit: u32) -> Result<Self, TableError> {
        let categories = vec![
            entry(
                1,
                "Elektronik",
                &["smartphones", "laptops"],
                &[
                    (1, "Telefonlar", &["smartphones"]),
                    (2, "Laptoplar", &["laptops"]),
                ],
            ),
            entry(2, "Market", &["groceries"], &[]),
            entry(
                3,
                "Bakım Ürünleri",
                &["fragrances", "skincare"],
                &[
                    (1, "Parfümler", &["fragrances"]),
                    (2, "Cilt Bakımı", &["skincare"]),
                ],
            ),
            entry(
                4,
                "Mobilya ve Dekorasyon",
                &["furniture", "home-decoration"],
                &[
                    (1, "Mobilya", &["furniture"]),
                    (2, "Ev Dekorasyon", &["home-decoration"]),
                ],
            ),
            entry(
                5,
                "Üst Giyim",
                &["tops", "womens-dresses", "mens-shirts"],
                &[
                    (1, "Kadın Giyim", &["tops", "womens-dresses"]),
                    (2, "Erkek Giyim", &["mens-shirts"]),
                ],
            ),
            entry(
                6,
                "Alt Giyim",
                &["womens-shoes", "mens-shoes"],
                &[
                    (1, "Kadın Ayakkabı", &["womens-shoes"]),
                    (2, "Erkek Ayakkabı", &["mens-shoes"]),
                ],
            ),
        ];
        Self::new(categories, fallback_limit)
    }

    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<&CategoryEntry> {
        self.categories.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn categories(&self) -> &[CategoryEntry] {
        &self.categories
    }

    /// Categories whose name contains `query`, case-insensitively. A blank
    /// query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Category> {
        let needle = query.trim().to_lowercase();
        self.categories
            .iter()
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .map(CategoryEntry::category)
            .collect()
    }

    /// The category stamped on products, falling back for unknown ids.
    #[must_use]
    pub fn category_or_fallback(&self, id: CategoryId) -> Category {
        self.get(id).map_or_else(
            || Category::new(id, FALLBACK_CATEGORY_NAME),
            CategoryEntry::category,
        )
    }

    /// Endpoint used for categories that are not in the table.
    #[must_use]
    pub const fn fallback_endpoint(&self) -> EndpointKey {
        EndpointKey::All {
            limit: self.fallback_limit,
        }
    }

    /// A fresh filter selection for `id`; unknown categories only get "all".
    #[must_use]
    pub fn filter_selection(&self, id: CategoryId) -> FilterSelection {
        self.get(id)
            .map_or_else(FilterSelection::default, CategoryEntry::filter_selection)
    }
}

fn entry(
    id: i32,
    name: &str,
    endpoints: &[&str],
    filters: &[(i32, &str, &[&str])],
) -> CategoryEntry {
    CategoryEntry {
        id: CategoryId::new(id),
        name: name.to_string(),
        endpoints: endpoints.iter().map(ToString::to_string).collect(),
        filters: filters
            .iter()
            .map(|(fid, fname, fendpoints)| FilterEntry {
                id: FilterId::new(*fid),
                name: (*fname).to_string(),
                endpoints: fendpoints.iter().map(ToString::to_string).collect(),
            })
            .collect(),
    }
}

fn validate_category(category: &CategoryEntry) -> Result<(), TableError> {
    let id = category.id;
    if category.endpoints.is_empty() {
        return Err(TableError::NoEndpoints(id));
    }

    let mut filter_ids = HashSet::new();
    let mut filter_names = HashSet::new();
    let mut covered = HashSet::new();

    for filter in &category.filters {
        if filter.id.is_all() || !filter_ids.insert(filter.id) {
            return Err(TableError::InvalidFilterId {
                category: id,
                filter: filter.id,
            });
        }
        if !filter_names.insert(filter.name.as_str()) {
            return Err(TableError::DuplicateFilterName {
                category: id,
                name: filter.name.clone(),
            });
        }
        if filter.endpoints.is_empty() {
            return Err(TableError::EmptyFilter {
                category: id,
                name: filter.name.clone(),
            });
        }
        for endpoint in &filter.endpoints {
            if !category.endpoints.contains(endpoint) {
                return Err(TableError::ForeignEndpoint {
                    category: id,
                    name: filter.name.clone(),
                    endpoint: endpoint.clone(),
                });
            }
            covered.insert(endpoint.as_str());
        }
    }

    if !category.filters.is_empty()
        && let Some(missing) = category
            .endpoints
            .iter()
            .find(|e| !covered.contains(e.as_str()))
    {
        return Err(TableError::UncoveredEndpoint {
            category: id,
            endpoint: missing.clone(),
        });
    }

    Ok(())
}
