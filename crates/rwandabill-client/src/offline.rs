//! A backend with no server behind it.

use rwandabill_protocol::{
    LoginRequest, LoginResponse, SignupRequest, SignupResponse, WireUser,
};

use crate::{AuthBackend, ClientError};

/// Fails every request as if the server were down.
///
/// Useful for working on the frontend with no backend running: in
/// development mode the session layer falls back to its mock directory
/// whenever the backend fails, so this makes every login go through the
/// fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

fn offline() -> ClientError {
    ClientError::Unreachable {
        detail: "offline backend".to_string(),
    }
}

impl AuthBackend for OfflineBackend {
    async fn current_user(&self, _token: &str) -> Result<WireUser, ClientError> {
        Err(offline())
    }

    async fn login(
        &self,
        _request: &LoginRequest,
    ) -> Result<LoginResponse, ClientError> {
        Err(offline())
    }

    async fn logout(&self, _token: &str) -> Result<(), ClientError> {
        Err(offline())
    }

    async fn signup(
        &self,
        _request: &SignupRequest,
    ) -> Result<SignupResponse, ClientError> {
        Err(offline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_backend_fails_every_call() {
        let backend = OfflineBackend;
        let login = LoginRequest::normalized("user@example.com", "user123");

        assert!(matches!(
            backend.login(&login).await,
            Err(ClientError::Unreachable { .. })
        ));
        assert!(backend.current_user("t").await.is_err());
        assert!(backend.logout("t").await.is_err());
    }
}
