use factorlab_core::config::DashboardConfig;
use factorlab_core::data::DataProvider;
use std::sync::Arc;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub config: DashboardConfig,
    /// Blocking provider; only call it from `spawn_blocking`.
    pub provider: Arc<dyn DataProvider>,
}

impl AppState {
    pub fn new(config: DashboardConfig, provider: Arc<dyn DataProvider>) -> Arc<Self> {
        Arc::new(Self { config, provider })
    }
}
