//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiError, ProductApiClient};
use crate::config::DeskConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the catalog API client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DeskConfig,
    api: ProductApiClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog API client cannot be built.
    pub fn new(config: DeskConfig) -> Result<Self, ApiError> {
        let api = ProductApiClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &DeskConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn api(&self) -> &ProductApiClient {
        &self.inner.api
    }
}
