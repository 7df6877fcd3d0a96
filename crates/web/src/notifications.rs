//! User-facing notifications.
//!
//! A notification is a short message shown once on the next rendered page.
//! Pages rendered in the same request show them directly; notifications that
//! must survive a redirect are queued in the session ("flash") and drained by
//! the [`Flash`] extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Session key holding queued notifications.
pub const FLASH_KEY: &str = "flash_notifications";

/// Shown when the category list could not be loaded.
pub const CATEGORIES_UNAVAILABLE: &str = "Could not load product categories";

/// Shown after a product is saved.
pub const PRODUCT_CREATED: &str = "Product created successfully";

/// Shown when a save is refused or the request fails. Deliberately generic.
pub const PRODUCT_NOT_CREATED: &str = "Failed to create product";

/// Shown when the product list could not be loaded.
pub const PRODUCTS_UNAVAILABLE: &str = "Could not load products";

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Success,
    Error,
}

impl Level {
    /// CSS class suffix for templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A single message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// CSS class suffix for templates.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        self.level.as_str()
    }
}

/// Queue notifications to be shown on the next page rendered for this session.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn push_flash(
    session: &Session,
    notifications: impl IntoIterator<Item = Notification>,
) -> Result<(), tower_sessions::session::Error> {
    let mut queued: Vec<Notification> = session.get(FLASH_KEY).await?.unwrap_or_default();
    queued.extend(notifications);
    session.insert(FLASH_KEY, queued).await
}

/// Remove and return every queued notification.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn take_flash(
    session: &Session,
) -> Result<Vec<Notification>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<Notification>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}

/// Extractor that drains queued notifications.
///
/// Never rejects: a missing session or a session error yields no notifications.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Flash(notifications): Flash) -> impl IntoResponse {
///     format!("{} pending", notifications.len())
/// }
/// ```
pub struct Flash(pub Vec<Notification>);

impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let notifications = match parts.extensions.get::<Session>() {
            Some(session) => take_flash(session).await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to read flash notifications");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Ok(Self(notifications))
    }
}
