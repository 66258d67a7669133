//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::orders::OrderStore;
use crate::services::postal::{DirectoryResolver, PostalResolver};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the postal resolver, and the order store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    postal: Arc<dyn PostalResolver>,
    orders: OrderStore,
}

impl AppState {
    /// Create the application state with the seeded catalog and the
    /// directory-backed postal resolver.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let postal = Arc::new(DirectoryResolver::new(config.postal_lookup_latency));
        Self::with_resolver(config, postal)
    }

    /// Create the application state with a specific postal resolver.
    ///
    /// Tests use this to inject failing or slow resolvers.
    #[must_use]
    pub fn with_resolver(config: StorefrontConfig, postal: Arc<dyn PostalResolver>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Catalog::seed(),
                postal,
                orders: OrderStore::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the postal-code resolver.
    #[must_use]
    pub fn postal(&self) -> &dyn PostalResolver {
        self.inner.postal.as_ref()
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }
}
