//! The product create-form workflow.
//!
//! `CreateForm` owns everything the create view needs between requests of
//! one form session: the category list, the last submitted values, their
//! field errors and pending notifications. It knows nothing about HTTP; the
//! route handlers and the CLI both drive it.
//!
//! # Lifecycle
//!
//! ```text
//! mount(source)            one category fetch; failure => empty list + one error notification
//!   |
//! submit(sink, input)      validate every field
//!   |-- invalid            Invalid, sink not called, input and errors kept
//!   |-- save -> Ok(true)   Saved { redirect_to: "/product" }, success notification
//!   '-- Ok(false) | Err    Failed, one generic error notification, input kept
//! ```

use chrono::NaiveDate;
use tracing::instrument;

use product_desk_core::{Category, FieldErrors, ProductForm, validate};

use crate::api::{CategorySource, ProductSink};
use crate::notifications::{
    CATEGORIES_UNAVAILABLE, Notification, PRODUCT_CREATED, PRODUCT_NOT_CREATED,
};

/// Where a successful submit navigates to.
pub const LIST_PATH: &str = "/product";

/// Result of [`CreateForm::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field failed validation; nothing was sent.
    Invalid,
    /// The product was stored; navigate to `redirect_to`.
    Saved { redirect_to: &'static str },
    /// The API refused the product or could not be reached.
    Failed,
}

/// State of one create-form session.
#[derive(Debug, Clone, Default)]
pub struct CreateForm {
    categories: Vec<Category>,
    values: ProductForm,
    errors: FieldErrors,
    notifications: Vec<Notification>,
}

impl CreateForm {
    /// Start a form session: fetch the categories once.
    ///
    /// A failed fetch is not fatal: the form is still usable with an empty
    /// category selector, and a single error notification is queued.
    #[instrument(skip_all)]
    pub async fn mount<S: CategorySource>(source: &S) -> Self {
        match source.get_all_categories().await {
            Ok(categories) => Self::from_categories(categories),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load categories");
                Self {
                    notifications: vec![Notification::error(CATEGORIES_UNAVAILABLE)],
                    ..Self::default()
                }
            }
        }
    }

    /// Resume a form session whose categories were already loaded.
    #[must_use]
    pub fn from_categories(categories: Vec<Category>) -> Self {
        Self {
            categories,
            ..Self::default()
        }
    }

    /// Validate `input` and, if every field passes, save it through `sink`.
    ///
    /// `today` is the latest acceptable `dateAdded`. The submitted values
    /// are kept on the form whatever the outcome.
    #[instrument(skip_all, fields(product_code = %input.product_code))]
    pub async fn submit<P: ProductSink>(
        &mut self,
        sink: &P,
        input: ProductForm,
        today: NaiveDate,
    ) -> SubmitOutcome {
        let validated = validate(&input, today);
        self.values = input;

        let product = match validated {
            Ok(product) => {
                self.errors = FieldErrors::default();
                product
            }
            Err(errors) => {
                tracing::debug!(failed = errors.len(), "Product form rejected");
                self.errors = errors;
                return SubmitOutcome::Invalid;
            }
        };

        match sink.save_product(&product).await {
            Ok(true) => {
                tracing::info!(product_code = %product.product_code(), "Product created");
                self.notifications.push(Notification::success(PRODUCT_CREATED));
                SubmitOutcome::Saved {
                    redirect_to: LIST_PATH,
                }
            }
            Ok(false) => {
                tracing::warn!(product_code = %product.product_code(), "Product save refused");
                self.notifications.push(Notification::error(PRODUCT_NOT_CREATED));
                SubmitOutcome::Failed
            }
            Err(e) => {
                tracing::error!(product_code = %product.product_code(), error = %e, "Product save failed");
                self.notifications.push(Notification::error(PRODUCT_NOT_CREATED));
                SubmitOutcome::Failed
            }
        }
    }

    /// Categories for the selector, in API order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The values last submitted (empty before the first submit).
    #[must_use]
    pub const fn values(&self) -> &ProductForm {
        &self.values
    }

    /// Field errors from the last submit.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Pending notifications, without consuming them.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Remove and return pending notifications so each is shown once.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use product_desk_core::{Field, Product};

    use super::*;
    use crate::api::ApiError;
    use crate::notifications::Level;

    /// In-memory stand-in for the catalog API.
    struct FakeApi {
        categories: Option<Vec<Category>>,
        save_result: Option<bool>,
        category_calls: AtomicUsize,
        saved: Mutex<Vec<Product>>,
    }

    impl FakeApi {
        fn new(categories: Option<Vec<Category>>, save_result: Option<bool>) -> Self {
            Self {
                categories,
                save_result,
                category_calls: AtomicUsize::new(0),
                saved: Mutex::new(Vec::new()),
            }
        }

        fn saved_count(&self) -> usize {
            self.saved.lock().unwrap().len()
        }
    }

    impl CategorySource for FakeApi {
        async fn get_all_categories(&self) -> Result<Vec<Category>, ApiError> {
            self.category_calls.fetch_add(1, Ordering::SeqCst);
            self.categories.clone().ok_or_else(|| ApiError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    impl ProductSink for FakeApi {
        async fn save_product(&self, product: &Product) -> Result<bool, ApiError> {
            self.saved.lock().unwrap().push(product.clone());
            self.save_result.ok_or_else(|| ApiError::Parse("connection reset".to_string()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn categories() -> Vec<Category> {
        vec![Category::new("1", "Tools"), Category::new("2", "Toys")]
    }

    fn widget_input() -> ProductForm {
        ProductForm {
            product_code: "PROD-0001".to_string(),
            name: "Widget".to_string(),
            category_id: "1".to_string(),
            price: "10".to_string(),
            quantity: "5".to_string(),
            date_added: "2024-01-01".to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_mount_loads_categories_once() {
        let api = FakeApi::new(Some(categories()), Some(true));
        let mut form = CreateForm::mount(&api).await;

        assert_eq!(api.category_calls.load(Ordering::SeqCst), 1);
        assert_eq!(form.categories(), categories().as_slice());
        assert!(form.take_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_mount_failure_leaves_selector_empty_with_one_notification() {
        let api = FakeApi::new(None, Some(true));
        let mut form = CreateForm::mount(&api).await;

        assert!(form.categories().is_empty());
        assert_eq!(
            form.take_notifications(),
            vec![Notification::error(CATEGORIES_UNAVAILABLE)]
        );
        assert!(form.take_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_form_usable_after_category_failure() {
        let api = FakeApi::new(None, Some(true));
        let mut form = CreateForm::mount(&api).await;
        let _ = form.take_notifications();

        let outcome = form.submit(&api, widget_input(), today()).await;
        assert_eq!(outcome, SubmitOutcome::Saved { redirect_to: "/product" });
        assert_eq!(api.category_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_success_redirects_to_list() {
        let api = FakeApi::new(Some(categories()), Some(true));
        let mut form = CreateForm::from_categories(categories());

        let outcome = form.submit(&api, widget_input(), today()).await;

        assert_eq!(outcome, SubmitOutcome::Saved { redirect_to: LIST_PATH });
        assert_eq!(api.saved_count(), 1);
        assert_eq!(
            form.take_notifications(),
            vec![Notification::success(PRODUCT_CREATED)]
        );
    }

    #[tokio::test]
    async fn test_submit_refused_keeps_input_without_redirect() {
        let api = FakeApi::new(Some(categories()), Some(false));
        let mut form = CreateForm::from_categories(categories());

        let outcome = form.submit(&api, widget_input(), today()).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(form.values(), &widget_input());
        let notifications = form.take_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, Level::Error);
        assert_eq!(notifications[0].message, PRODUCT_NOT_CREATED);
    }

    #[tokio::test]
    async fn test_submit_transport_error_uses_same_notification() {
        let api = FakeApi::new(Some(categories()), None);
        let mut form = CreateForm::from_categories(categories());

        let outcome = form.submit(&api, widget_input(), today()).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(
            form.take_notifications(),
            vec![Notification::error(PRODUCT_NOT_CREATED)]
        );
        assert_eq!(form.values(), &widget_input());
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_sink() {
        let api = FakeApi::new(Some(categories()), Some(true));
        let mut form = CreateForm::from_categories(categories());
        let input = ProductForm {
            quantity: "0".to_string(),
            ..widget_input()
        };

        let outcome = form.submit(&api, input.clone(), today()).await;

        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert_eq!(api.saved_count(), 0);
        assert_eq!(
            form.errors().get(Field::Quantity),
            Some("Quantity must be greater than 0")
        );
        assert_eq!(form.values(), &input);
        assert!(form.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_errors_cleared_on_next_valid_submit() {
        let api = FakeApi::new(Some(categories()), Some(false));
        let mut form = CreateForm::from_categories(categories());

        let bad = ProductForm {
            price: "-1".to_string(),
            ..widget_input()
        };
        assert_eq!(form.submit(&api, bad, today()).await, SubmitOutcome::Invalid);
        assert!(!form.errors().is_empty());

        assert_eq!(
            form.submit(&api, widget_input(), today()).await,
            SubmitOutcome::Failed
        );
        assert!(form.errors().is_empty());
    }

    #[tokio::test]
    async fn test_each_submit_issues_one_request() {
        let api = FakeApi::new(Some(categories()), Some(false));
        let mut form = CreateForm::from_categories(categories());

        form.submit(&api, widget_input(), today()).await;
        form.submit(&api, widget_input(), today()).await;

        assert_eq!(api.saved_count(), 2);
        assert_eq!(form.take_notifications().len(), 2);
    }
}
