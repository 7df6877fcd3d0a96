//! Product list and create-form route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use tower_sessions::Session;
use tracing::instrument;

use product_desk_core::validation::DATE_FORMAT;
use product_desk_core::{Category, Field, FieldErrors, ProductForm, StoredProduct, category_name};

use crate::api::CategorySource;
use crate::error::Result;
use crate::form::{CreateForm, SubmitOutcome};
use crate::notifications::{Flash, Notification, PRODUCTS_UNAVAILABLE, push_flash};
use crate::state::AppState;

/// Session key holding the categories fetched when the form was opened.
pub const FORM_CATEGORIES_KEY: &str = "create_form_categories";

// =============================================================================
// View Types
// =============================================================================

/// One input on the create form: the value to echo back and its error.
#[derive(Debug, Clone, Default)]
pub struct FieldView {
    pub value: String,
    pub error: Option<&'static str>,
}

impl FieldView {
    fn new(values: &ProductForm, errors: &FieldErrors, field: Field) -> Self {
        Self {
            value: values.value(field).to_string(),
            error: errors.get(field),
        }
    }
}

/// An entry in the category selector.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// A row of the product list.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub product_code: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub quantity: String,
    pub date_added: String,
    pub description: String,
}

impl ProductRow {
    fn new(product: &StoredProduct, categories: &[Category]) -> Self {
        let category = product.category_id.as_ref().map_or_else(String::new, |id| {
            category_name(categories, id).map_or_else(|| id.to_string(), str::to_string)
        });

        Self {
            product_code: product.product_code.clone(),
            name: product.name.clone(),
            category,
            price: product
                .price
                .map(|p| format!("{:.2}", p.round_dp(2)))
                .unwrap_or_default(),
            quantity: product.quantity.map(|q| q.to_string()).unwrap_or_default(),
            date_added: product
                .date_added
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            description: product.description.clone().unwrap_or_default(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Create form page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/create.html")]
pub struct ProductCreateTemplate {
    pub notifications: Vec<Notification>,
    pub categories: Vec<CategoryOption>,
    pub today: String,
    pub product_code: FieldView,
    pub name: FieldView,
    pub category_id: FieldView,
    pub price: FieldView,
    pub quantity: FieldView,
    pub date_added: FieldView,
    pub description: FieldView,
}

impl ProductCreateTemplate {
    fn new(form: &CreateForm, notifications: Vec<Notification>, today: NaiveDate) -> Self {
        let values = form.values();
        let errors = form.errors();
        let categories = form
            .categories()
            .iter()
            .map(|c| CategoryOption {
                id: c.id.to_string(),
                name: c.name.clone(),
                selected: c.id.as_str() == values.category_id.trim(),
            })
            .collect();

        Self {
            notifications,
            categories,
            today: today.format(DATE_FORMAT).to_string(),
            product_code: FieldView::new(values, errors, Field::ProductCode),
            name: FieldView::new(values, errors, Field::Name),
            category_id: FieldView::new(values, errors, Field::CategoryId),
            price: FieldView::new(values, errors, Field::Price),
            quantity: FieldView::new(values, errors, Field::Quantity),
            date_added: FieldView::new(values, errors, Field::DateAdded),
            description: FieldView::new(values, errors, Field::Description),
        }
    }
}

/// Product list page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub notifications: Vec<Notification>,
    pub products: Vec<ProductRow>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Today's date, the latest acceptable `dateAdded`.
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Products list page handler.
///
/// GET /product
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, Flash(mut notifications): Flash) -> Response {
    let (products, categories) =
        tokio::join!(state.api().list_products(), state.api().get_all_categories());

    let products = products.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch products");
        notifications.push(Notification::error(PRODUCTS_UNAVAILABLE));
        Vec::new()
    });

    // Without categories the list still renders, showing raw category ids.
    let categories = categories.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to fetch categories for product list");
        Vec::new()
    });

    ProductsIndexTemplate {
        notifications,
        products: products
            .iter()
            .map(|p| ProductRow::new(p, &categories))
            .collect(),
    }
    .into_response()
}

/// Create form handler.
///
/// GET /create
///
/// Opens a form session: fetches the categories once and keeps them in the
/// session for later submits of this form.
#[instrument(skip_all)]
pub async fn new_product(
    State(state): State<AppState>,
    session: Session,
    Flash(mut notifications): Flash,
) -> Result<Response> {
    let mut form = CreateForm::mount(state.api()).await;
    session.insert(FORM_CATEGORIES_KEY, form.categories()).await?;

    notifications.extend(form.take_notifications());
    Ok(ProductCreateTemplate::new(&form, notifications, today()).into_response())
}

/// Create product handler.
///
/// POST /create
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<ProductForm>,
) -> Result<Response> {
    let mut form = match session.get::<Vec<Category>>(FORM_CATEGORIES_KEY).await? {
        Some(categories) => CreateForm::from_categories(categories),
        None => {
            // Submitted without opening the form in this session.
            let form = CreateForm::mount(state.api()).await;
            session.insert(FORM_CATEGORIES_KEY, form.categories()).await?;
            form
        }
    };

    let today = today();
    let outcome = form.submit(state.api(), input, today).await;
    let notifications = form.take_notifications();

    match outcome {
        SubmitOutcome::Saved { redirect_to } => {
            session.remove::<Vec<Category>>(FORM_CATEGORIES_KEY).await?;
            push_flash(&session, notifications).await?;
            Ok(Redirect::to(redirect_to).into_response())
        }
        SubmitOutcome::Invalid => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            ProductCreateTemplate::new(&form, notifications, today),
        )
            .into_response()),
        SubmitOutcome::Failed => {
            Ok(ProductCreateTemplate::new(&form, notifications, today).into_response())
        }
    }
}
