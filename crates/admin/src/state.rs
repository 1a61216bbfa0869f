//! Application state shared across admin request handlers.

use crate::backend::AdminBackendClient;
use crate::config::AdminConfig;

/// Shared application state.
///
/// Cheaply cloneable; the backend client holds its own `Arc` internally.
#[derive(Clone)]
pub struct AppState {
    config: AdminConfig,
    backend: AdminBackendClient,
}

impl AppState {
    /// Build state from configuration.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let backend = AdminBackendClient::new(&config.backend);
        Self { config, backend }
    }

    #[must_use]
    pub const fn config(&self) -> &AdminConfig {
        &self.config
    }

    #[must_use]
    pub const fn backend(&self) -> &AdminBackendClient {
        &self.backend
    }
}
