//! `SessionBuilder`: assembles a [`SessionManager`] from configuration.
//!
//! This is the entry point for wiring the session layer into an app. It
//! ties together the layers: HTTP client → session manager → token store.

use std::time::Duration;

use rwandabill_client::{AuthBackend, HttpAuthBackend, HttpConfig};
use rwandabill_session::{
    MockDirectory, RunMode, SessionConfig, SessionManager, TokenStore,
};

use crate::RwandabillError;

/// Builder for configuring a session manager.
///
/// # Example
///
/// ```rust,no_run
/// use rwandabill::prelude::*;
///
/// # async fn run() -> Result<(), RwandabillError> {
/// let mut session = SessionBuilder::new()
///     .base_url("http://localhost:8080")
///     .mode(RunMode::Production)
///     .build(FileTokenStore::new("/tmp/rwandabill/token"))?;
///
/// session.check_auth().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    http: HttpConfig,
    session: SessionConfig,
    directory: Option<MockDirectory>,
}

impl SessionBuilder {
    /// Creates a builder with default settings (development mode,
    /// `http://localhost:8080`, seeded mock directory).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the auth service.
    pub fn base_url(mut self, url: &str) -> Self {
        self.http.base_url = url.to_string();
        self
    }

    /// Sets the per-request timeout for the auth service.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.http.request_timeout = timeout;
        self
    }

    /// Replaces the whole HTTP configuration.
    pub fn http_config(mut self, config: HttpConfig) -> Self {
        self.http = config;
        self
    }

    /// Sets development or production mode.
    pub fn mode(mut self, mode: RunMode) -> Self {
        self.session.mode = mode;
        self
    }

    /// Replaces the whole session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session = config;
        self
    }

    /// Uses `directory` instead of the default seed for the development
    /// fallback.
    pub fn mock_directory(mut self, directory: MockDirectory) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Builds a manager that talks to the configured HTTP backend.
    ///
    /// # Errors
    /// Returns [`RwandabillError::Client`] if the base URL is invalid.
    pub fn build<S: TokenStore>(
        self,
        store: S,
    ) -> Result<SessionManager<HttpAuthBackend, S>, RwandabillError> {
        let backend = HttpAuthBackend::new(&self.http)?;
        Ok(self.build_with(backend, store))
    }

    /// Builds a manager around any backend (an offline one, a test
    /// double, ...). The HTTP settings are ignored.
    pub fn build_with<B: AuthBackend, S: TokenStore>(
        self,
        backend: B,
        store: S,
    ) -> SessionManager<B, S> {
        tracing::debug!(mode = ?self.session.mode, "building session manager");
        SessionManager::new(
            self.session,
            backend,
            store,
            self.directory.unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use rwandabill_client::OfflineBackend;
    use rwandabill_session::MemoryTokenStore;

    use super::*;

    #[test]
    fn test_builder_defaults_to_development() {
        let mgr = SessionBuilder::new()
            .build_with(OfflineBackend, MemoryTokenStore::new());
        assert_eq!(mgr.config().mode, RunMode::Development);
        assert!(!mgr.directory().is_empty());
    }

    #[test]
    fn test_builder_mode_and_directory_are_applied() {
        let mgr = SessionBuilder::new()
            .mode(RunMode::Production)
            .mock_directory(MockDirectory::empty())
            .build_with(OfflineBackend, MemoryTokenStore::new());

        assert_eq!(mgr.config().mode, RunMode::Production);
        assert!(mgr.directory().is_empty());
    }

    #[test]
    fn test_builder_invalid_url_fails() {
        let result = SessionBuilder::new()
            .base_url("::not a url::")
            .build(MemoryTokenStore::new());

        assert!(matches!(result, Err(RwandabillError::Client(_))));
    }
}
