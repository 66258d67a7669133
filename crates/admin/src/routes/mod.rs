//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Health check
//! GET  /                                    - Redirect to /admin
//! GET  /admin                               - Platform overview
//!
//! # Artisan dashboard (artisan selected by path, no authentication)
//! GET  /artisans/{id}                       - Dashboard
//! GET  /artisans/{id}/products              - Product table
//! GET  /artisans/{id}/orders                - Order table
//! POST /artisans/{id}/orders/{order}/status - Advance order status
//! GET  /artisans/{id}/profile               - Profile form
//! POST /artisans/{id}/profile               - Update shipping zone, payment
//!                                             methods, shipping policy
//! ```

pub mod dashboard;
pub mod orders;
pub mod overview;
pub mod products;
pub mod profile;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the artisan dashboard routes router.
pub fn artisan_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(dashboard::show))
        .route("/{id}/products", get(products::index))
        .route("/{id}/orders", get(orders::index))
        .route("/{id}/orders/{order}/status", post(orders::update_status))
        .route(
            "/{id}/profile",
            get(profile::show).post(profile::update),
        )
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/admin") }))
        .route("/admin", get(overview::show))
        .nest("/artisans", artisan_routes())
}

/// Build the full application router with the health check.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
