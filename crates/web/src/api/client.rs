//! HTTP client for the catalog API.
//!
//! # Endpoints
//!
//! ```text
//! GET  {root}/categories  -> [{"id": ..., "name": ...}]
//! GET  {root}/products    -> [{"id": ..., "productCode": ..., ...}]
//! POST {root}/products    <- {"productCode": ..., "price": 10.5, ...}
//! ```

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;
use url::Url;

use product_desk_core::{Category, Product, StoredProduct};

use super::{ApiError, CategorySource, ProductSink};
use crate::config::ProductApiConfig;

/// Catalog API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct ProductApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ProductApiClient {
    /// Create a new catalog API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ProductApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::Parse(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// The API root this client talks to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List every stored product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the API answers with a non-2xx
    /// status, or the body is not a JSON array. Elements that are not
    /// product records (no `id`, not an object) are skipped with a warning.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<StoredProduct>, ApiError> {
        let url = self.endpoint("products")?;
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response).await?;

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(decode_products(rows))
    }

    /// Check that the API answers at all.
    ///
    /// # Errors
    ///
    /// Returns error if the categories endpoint cannot be fetched.
    pub async fn ping(&self) -> Result<(), ApiError> {
        self.get_all_categories().await.map(|_| ())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }
}

fn decode_products(rows: Vec<serde_json::Value>) -> Vec<StoredProduct> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable product record");
                None
            }
        })
        .collect()
}

impl CategorySource for ProductApiClient {
    #[instrument(skip(self))]
    async fn get_all_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.endpoint("categories")?;
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response).await?;

        let categories: Vec<Category> = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        tracing::debug!(count = categories.len(), "Fetched categories");
        Ok(categories)
    }
}

impl ProductSink for ProductApiClient {
    #[instrument(skip(self, product), fields(product_code = %product.product_code()))]
    async fn save_product(&self, product: &Product) -> Result<bool, ApiError> {
        let url = self.endpoint("products")?;
        let response = self.client.post(url).json(product).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(true);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::warn!(
            status = status.as_u16(),
            message = %message,
            "Catalog API refused product"
        );
        Ok(false)
    }
}

/// Turn a non-2xx response into `ApiError::Api`, keeping the body as the message.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Api {
        status: status.as_u16(),
        message: if message.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string()
        } else {
            message
        },
    })
}
