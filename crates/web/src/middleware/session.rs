//! Session middleware configuration.
//!
//! Sessions only carry form-session state (the category list fetched on
//! mount) and queued notifications, so they live in memory: a restart
//! simply starts every form session over.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::DeskConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "product_desk_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &DeskConfig) -> SessionManagerLayer<MemoryStore> {
    session_layer(MemoryStore::default(), config.is_secure())
}

/// Build the session layer over `store`.
#[must_use]
pub fn session_layer(store: MemoryStore, is_secure: bool) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
