//! Shared helpers for Tianguis integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::IpAddr;
use std::time::Duration;

use axum::Router;
use secrecy::SecretString;

use tianguis_storefront::config::StorefrontConfig;
use tianguis_storefront::routes;
use tianguis_storefront::state::AppState;

/// A storefront configuration that never touches the environment.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://localhost:3000".to_owned(),
        // Key derivation needs at least 32 bytes.
        session_secret: SecretString::from("kT9#mV2qX7!pL4zR8wN1$bJ6yH3cF5dG0aS"),
        postal_lookup_latency: Duration::ZERO,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// The storefront router with the seeded catalog and directory resolver.
#[must_use]
pub fn test_app() -> Router {
    routes::app(AppState::new(test_config()))
}
