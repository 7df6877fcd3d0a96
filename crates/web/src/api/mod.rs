//! Remote catalog API access.
//!
//! The create form only needs two things from the outside world, and they
//! are expressed as traits so the workflow can run against the real HTTP
//! client or an in-memory fake:
//!
//! - [`CategorySource`] - fetch every category, in API order
//! - [`ProductSink`] - persist a validated product, reporting success as a bool
//!
//! [`ProductApiClient`] implements both over HTTP.

mod client;

use std::future::Future;

use product_desk_core::{Category, Product};
use thiserror::Error;

pub use client::ProductApiClient;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, reset, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An endpoint URL could not be built from the configured root.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Read access to product categories.
pub trait CategorySource: Sync {
    /// Fetch all categories, in the order the API returns them.
    fn get_all_categories(&self) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send;
}

/// Write access to products.
pub trait ProductSink: Sync {
    /// Persist a product.
    ///
    /// `Ok(true)` means the record was stored; `Ok(false)` means the API
    /// answered but refused it. `Err` means no answer was obtained.
    fn save_product(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<bool, ApiError>> + Send;
}
