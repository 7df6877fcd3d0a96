//! Product creation command.
//!
//! Runs the same workflow as the web create form: categories are loaded
//! once, the input is validated field by field, and only valid input is
//! sent to the catalog API.
//!
//! # Usage
//!
//! ```bash
//! pd-cli create --product-code PROD-0001 --name Widget --category-id 1 \
//!     --price 10 --quantity 5 --date-added 2024-01-01 --description "Blue"
//! ```

use clap::Args;
use product_desk_core::validation::DATE_FORMAT;
use product_desk_core::{FieldErrors, ProductForm, category_name};
use product_desk_web::form::{CreateForm, SubmitOutcome};
use thiserror::Error;

use super::{SetupError, api_client};

/// Arguments for `pd-cli create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Product code (`PROD-` followed by four digits)
    #[arg(long)]
    pub product_code: String,

    /// Product name (at most 100 characters)
    #[arg(long)]
    pub name: String,

    /// Category id (see `pd-cli categories`)
    #[arg(long)]
    pub category_id: String,

    /// Unit price, greater than 0
    #[arg(long)]
    pub price: String,

    /// Quantity in stock, a whole number greater than 0
    #[arg(long)]
    pub quantity: String,

    /// Date added as YYYY-MM-DD, not later than today [default: today]
    #[arg(long)]
    pub date_added: Option<String>,

    /// Free-form description (at most 500 characters)
    #[arg(long, default_value = "")]
    pub description: String,
}

impl CreateArgs {
    fn into_form(self, default_date: String) -> ProductForm {
        ProductForm {
            product_code: self.product_code,
            name: self.name,
            category_id: self.category_id,
            price: self.price,
            quantity: self.quantity,
            date_added: self.date_added.unwrap_or(default_date),
            description: self.description,
        }
    }
}

/// Errors that can occur while creating a product.
#[derive(Debug, Error)]
pub enum CreateError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// One or more fields failed validation.
    #[error("Invalid product: {0}")]
    Invalid(FieldErrors),

    /// The catalog API refused the product or could not be reached.
    #[error("{0}")]
    Failed(String),
}

/// Validate and save a product.
pub async fn create(args: CreateArgs) -> Result<(), CreateError> {
    let api = api_client()?;
    let today = chrono::Local::now().date_naive();

    let mut form = CreateForm::mount(&api).await;
    for notification in form.take_notifications() {
        tracing::warn!("{}", notification.message);
    }

    let input = args.into_form(today.format(DATE_FORMAT).to_string());
    if let Some(category) = category_name(form.categories(), &input.category_id.trim().into()) {
        tracing::info!(category, "Creating product");
    }

    match form.submit(&api, input, today).await {
        SubmitOutcome::Saved { .. } => {
            for notification in form.take_notifications() {
                tracing::info!("{}", notification.message);
            }
            Ok(())
        }
        SubmitOutcome::Invalid => {
            for (field, message) in form.errors().iter() {
                tracing::error!(%field, "{message}");
            }
            Err(CreateError::Invalid(form.errors().clone()))
        }
        SubmitOutcome::Failed => {
            let message = form
                .take_notifications()
                .into_iter()
                .map(|n| n.message)
                .collect::<Vec<_>>()
                .join("; ");
            Err(CreateError::Failed(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: CreateArgs,
    }

    #[test]
    fn test_date_defaults_when_omitted() {
        let cli = TestCli::parse_from([
            "pd-cli",
            "--product-code",
            "PROD-0001",
            "--name",
            "Widget",
            "--category-id",
            "1",
            "--price",
            "10",
            "--quantity",
            "5",
        ]);

        let form = cli.args.into_form("2024-06-15".to_string());
        assert_eq!(form.date_added, "2024-06-15");
        assert_eq!(form.description, "");
        assert_eq!(form.product_code, "PROD-0001");
    }

    #[test]
    fn test_explicit_date_wins() {
        let cli = TestCli::parse_from([
            "pd-cli",
            "--product-code",
            "PROD-0001",
            "--name",
            "Widget",
            "--category-id",
            "1",
            "--price",
            "10",
            "--quantity",
            "5",
            "--date-added",
            "2024-01-01",
            "--description",
            "Blue",
        ]);

        let form = cli.args.into_form("2024-06-15".to_string());
        assert_eq!(form.date_added, "2024-01-01");
        assert_eq!(form.description, "Blue");
    }
}
