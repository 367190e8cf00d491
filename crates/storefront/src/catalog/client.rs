//! HTTP client for the upstream product catalog.

use std::sync::Arc;

use tracing::instrument;
use url::Url;

use crate::catalog::types::{CatalogPage, EndpointKey, RawProduct};
use crate::catalog::{CatalogError, CatalogSource};

/// Client for the public catalog API (`dummyjson.com` compatible).
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a client rooted at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &Url) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: with_trailing_slash(base_url),
            }),
        }
    }

    fn endpoint_url(&self, key: &EndpointKey) -> Result<Url, CatalogError> {
        self.inner
            .base_url
            .join(&key.path())
            .map_err(|e| CatalogError::InvalidUrl {
                endpoint: key.to_string(),
                reason: e.to_string(),
            })
    }
}

impl CatalogSource for CatalogClient {
    #[instrument(skip(self), fields(endpoint = %key))]
    async fn fetch_endpoint(&self, key: &EndpointKey) -> Result<Vec<RawProduct>, CatalogError> {
        let url = self.endpoint_url(key)?;

        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Http {
                endpoint: key.to_string(),
                source: e,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| CatalogError::Http {
            endpoint: key.to_string(),
            source: e,
        })?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                endpoint: key.to_string(),
                status: status.as_u16(),
            });
        }

        let page: CatalogPage = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse {
                endpoint: key.to_string(),
                source: e,
            }
        })?;

        let records = page.into_records();
        tracing::debug!(count = records.len(), "Fetched catalog page");
        Ok(records)
    }
}

/// `Url::join` drops the last path segment unless it ends in `/`.
fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
