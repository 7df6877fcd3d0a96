//! Category listing command.
//!
//! # Usage
//!
//! ```bash
//! pd-cli categories
//! ```
//!
//! # Environment Variables
//!
//! - `PRODUCT_API_URL` - Base URL of the catalog API
//! - `PRODUCT_API_TOKEN` - Optional bearer token

use std::io::{self, Write};

use product_desk_core::Category;
use product_desk_web::api::{ApiError, CategorySource};
use thiserror::Error;

use super::{SetupError, api_client};

/// Errors that can occur while listing categories.
#[derive(Debug, Error)]
pub enum CategoriesError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("Failed to load categories: {0}")]
    Api(#[from] ApiError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Print every category as `id<TAB>name`, in API order.
pub async fn list() -> Result<(), CategoriesError> {
    let api = api_client()?;
    let categories = api.get_all_categories().await?;

    tracing::info!(count = categories.len(), "Categories loaded");
    write_categories(&mut io::stdout().lock(), &categories)?;
    Ok(())
}

fn write_categories(out: &mut impl Write, categories: &[Category]) -> io::Result<()> {
    for category in categories {
        writeln!(out, "{}\t{}", category.id, category.name)?;
    }
    Ok(())
}
