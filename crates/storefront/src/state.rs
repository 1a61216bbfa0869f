//! Application state shared across handlers.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tower_sessions::session::Id;

use crate::backend::BackendClient;
use crate::config::StorefrontConfig;
use crate::services::GoogleClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backend API client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    google: Option<GoogleClient>,
    /// Sessions with a checkout currently in flight.
    checkout_locks: Mutex<HashSet<Id>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let backend = BackendClient::new(&config.backend);
        let google = config.google.as_ref().map(GoogleClient::new);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                google,
                checkout_locks: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get the Google OAuth client, if configured.
    #[must_use]
    pub fn google(&self) -> Option<&GoogleClient> {
        self.inner.google.as_ref()
    }

    /// Mark a checkout as in flight for the session.
    ///
    /// Returns `None` when the session already has one pending. The
    /// returned guard releases the slot when dropped, so every exit path
    /// of the checkout handler releases it.
    #[must_use]
    pub fn begin_checkout(&self, session_id: Id) -> Option<CheckoutGuard> {
        let mut locks = self
            .inner
            .checkout_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if locks.insert(session_id) {
            Some(CheckoutGuard {
                state: self.clone(),
                session_id,
            })
        } else {
            None
        }
    }
}

/// Releases a session's checkout slot on drop.
pub struct CheckoutGuard {
    state: AppState,
    session_id: Id,
}

impl Drop for CheckoutGuard {
    fn drop(&mut self) {
        let mut locks = self
            .state
            .inner
            .checkout_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.remove(&self.session_id);
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::config::{BackendApiConfig, StorefrontConfig};

    fn test_state() -> AppState {
        AppState::new(StorefrontConfig {
            host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://127.0.0.1:0".to_owned(),
            session_secret: SecretString::from("kJ8#mP2$vQ9@nR4!xT7%wY3&zB6*cD1^fG5(hL0)"),
            backend: BackendApiConfig {
                base_url: "http://127.0.0.1:1".to_owned(),
            },
            google: None,
            sentry_dsn: None,
            sentry_environment: None,
        })
    }

    #[test]
    fn test_second_checkout_for_same_session_is_refused() {
        let state = test_state();
        let id = Id::default();

        let guard = state.begin_checkout(id);
        assert!(guard.is_some());
        assert!(state.begin_checkout(id).is_none());

        drop(guard);
        assert!(state.begin_checkout(id).is_some());
    }

    #[test]
    fn test_checkout_guards_are_per_session() {
        let state = test_state();
        let _a = state.begin_checkout(Id::default());
        assert!(state.begin_checkout(Id::default()).is_some());
    }
}
