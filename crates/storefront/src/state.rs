//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::{CatalogClient, CatalogTable, TableError};
use crate::config::StorefrontConfig;
use crate::services::auth::AuthClient;
use crate::store::Store;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The [`Store`] sits behind a write lock so
/// intents are applied one at a time.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    auth: AuthClient,
    table: CatalogTable,
    store: RwLock<Store>,
}

impl AppState {
    /// Create a new application state with an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the category table fails validation.
    pub fn new(config: StorefrontConfig) -> Result<Self, TableError> {
        let table = CatalogTable::standard(config.default_product_limit)?;
        let http = reqwest::Client::new();
        let catalog = CatalogClient::new(http.clone(), &config.catalog_base_url);
        let auth = AuthClient::new(http, &config.auth_base_url, config.auth_api_key.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                auth,
                table,
                store: RwLock::new(Store::new()),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    #[must_use]
    pub fn table(&self) -> &CatalogTable {
        &self.inner.table
    }

    #[must_use]
    pub fn store(&self) -> &RwLock<Store> {
        &self.inner.store
    }
}
