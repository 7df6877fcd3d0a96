//! Integration test support for Product Desk.
//!
//! Tests run against real sockets: [`FakeCatalog`] serves a scripted catalog
//! API on an ephemeral port, and [`TestApp`] serves the product desk router
//! pointed at it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p product-desk-integration-tests
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use product_desk_web::config::{ConfigError, DeskConfig, LogFormat, ProductApiConfig};
use product_desk_web::state::AppState;

// =============================================================================
// Fake Catalog API
// =============================================================================

/// A scripted catalog API.
///
/// Serves `GET /api/categories`, `GET /api/products` and
/// `POST /api/products`. Every posted body is recorded; accepted ones are
/// also listed by `GET /api/products`.
#[derive(Clone)]
pub struct FakeCatalog {
    addr: SocketAddr,
    inner: Arc<CatalogState>,
}

#[derive(Default)]
struct CatalogState {
    /// `None` makes the categories endpoint answer 503.
    categories: Mutex<Option<Value>>,
    save_status: Mutex<u16>,
    category_requests: AtomicUsize,
    posted: Mutex<Vec<Value>>,
    stored: Mutex<Vec<Value>>,
}

impl FakeCatalog {
    /// Start a catalog with two categories that accepts every product.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn spawn() -> std::io::Result<Self> {
        let inner = Arc::new(CatalogState {
            categories: Mutex::new(Some(json!([
                {"id": 1, "name": "Tools"},
                {"id": "2", "name": "Toys"}
            ]))),
            save_status: Mutex::new(201),
            ..CatalogState::default()
        });

        let router = Router::new()
            .route("/api/categories", get(categories))
            .route("/api/products", get(list_products).post(save_product))
            .with_state(Arc::clone(&inner));

        let listener = TcpListener::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self { addr, inner })
    }

    /// Root URL of the API, as `PRODUCT_API_URL` would hold it.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Make the categories endpoint fail with 503.
    pub fn fail_categories(&self) {
        *lock(&self.inner.categories) = None;
    }

    /// Status returned for every `POST /api/products`.
    pub fn set_save_status(&self, status: u16) {
        *lock(&self.inner.save_status) = status;
    }

    /// Number of category fetches received so far.
    #[must_use]
    pub fn category_requests(&self) -> usize {
        self.inner.category_requests.load(Ordering::SeqCst)
    }

    /// Add a record to `GET /api/products` as another client might have
    /// written it.
    pub fn store_raw(&self, record: Value) {
        lock(&self.inner.stored).push(record);
    }

    /// Every product body posted, accepted or not.
    #[must_use]
    pub fn posted(&self) -> Vec<Value> {
        lock(&self.inner.posted).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn categories(State(state): State<Arc<CatalogState>>) -> Response {
    state.category_requests.fetch_add(1, Ordering::SeqCst);
    match lock(&state.categories).clone() {
        Some(categories) => Json(categories).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "categories unavailable").into_response(),
    }
}

async fn list_products(State(state): State<Arc<CatalogState>>) -> Json<Value> {
    Json(Value::Array(lock(&state.stored).clone()))
}

async fn save_product(State(state): State<Arc<CatalogState>>, Json(body): Json<Value>) -> Response {
    lock(&state.posted).push(body.clone());

    let status = StatusCode::from_u16(*lock(&state.save_status))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if !status.is_success() {
        return (status, "product rejected").into_response();
    }

    let mut stored = lock(&state.stored);
    let id = stored.len() + 1;
    let mut product = body;
    if let Value::Object(fields) = &mut product {
        fields.insert("id".to_string(), json!(id));
    }
    stored.push(product);

    (status, Json(json!({ "id": id }))).into_response()
}

// =============================================================================
// Product Desk Server
// =============================================================================

/// The product desk router served on an ephemeral port.
pub struct TestApp {
    addr: SocketAddr,
    /// Browser-like client: keeps the session cookie, does not follow redirects.
    pub client: reqwest::Client,
}

impl TestApp {
    /// Serve the product desk against the catalog API at `api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration, state or listener cannot be
    /// created.
    pub async fn spawn(api_url: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)).await?;
        let addr = listener.local_addr()?;

        let config = test_config(addr, api_url)?;
        let app = product_desk_web::app(AppState::new(config)?);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { addr, client })
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

/// Configuration for a test server on `addr`.
///
/// # Errors
///
/// Returns an error if `api_url` is not a valid http(s) URL.
pub fn test_config(addr: SocketAddr, api_url: &str) -> Result<DeskConfig, ConfigError> {
    Ok(DeskConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url: format!("http://{addr}"),
        api: ProductApiConfig::new(api_url, None)?,
        log_format: LogFormat::Text,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    })
}

/// The create-form fields for a valid product, as form-encoded pairs.
#[must_use]
pub fn valid_product_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("productCode", "PROD-0001"),
        ("name", "Widget"),
        ("categoryId", "1"),
        ("price", "10"),
        ("quantity", "5"),
        ("dateAdded", "2024-01-01"),
        ("description", ""),
    ]
}
