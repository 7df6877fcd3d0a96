//! CLI subcommands.

pub mod categories;
pub mod create;

use product_desk_web::api::{ApiError, ProductApiClient};
use product_desk_web::config::{ConfigError, ProductApiConfig};
use thiserror::Error;

/// Errors that can occur before a command reaches the catalog API.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The API client could not be built.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),
}

/// Build a catalog API client from `PRODUCT_API_URL` / `PRODUCT_API_TOKEN`.
fn api_client() -> Result<ProductApiClient, SetupError> {
    dotenvy::dotenv().ok();

    let config = ProductApiConfig::from_env()?;
    tracing::info!(api = %config.base_url, "Using catalog API");
    Ok(ProductApiClient::new(&config)?)
}
