//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::data::MarketData;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    data: MarketData,
}

impl AppState {
    /// Create the application state with the seeded marketplace data.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                data: MarketData::seed(),
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the marketplace data.
    #[must_use]
    pub fn data(&self) -> &MarketData {
        &self.inner.data
    }
}
