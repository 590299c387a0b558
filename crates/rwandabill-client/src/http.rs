//! HTTP backend using `reqwest`.

use reqwest::{Response, Url};
use rwandabill_protocol::{
    ErrorBody, LoginRequest, LoginResponse, SignupRequest, SignupResponse,
    WireUser,
};
use serde::de::DeserializeOwned;

use crate::{AuthBackend, ClientError, HttpConfig};

/// Path prefix of the auth controller on the backend.
const AUTH_PREFIX: &str = "api/auth";

/// An [`AuthBackend`] that talks to the RwandaBill REST API.
///
/// Cheap to clone: `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpAuthBackend {
    /// Builds a client for the backend at `config.base_url`.
    ///
    /// # Errors
    /// [`ClientError::InvalidUrl`] if the base URL does not parse, or
    /// [`ClientError::Unreachable`] if the TLS backend fails to initialize.
    pub fn new(config: &HttpConfig) -> Result<Self, ClientError> {
        // A trailing slash makes `join` append instead of replacing the
        // last path segment of the base.
        let mut raw = config.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw)
            .map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(send_error)?;

        tracing::debug!(base = %base, "auth backend configured");
        Ok(Self { client, base })
    }

    /// The resolved URL of an auth endpoint, e.g. `login` →
    /// `http://host/api/auth/login`.
    fn endpoint(&self, name: &str) -> Result<Url, ClientError> {
        self.base
            .join(&format!("{AUTH_PREFIX}/{name}"))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    /// `GET /health`: returns `true` when the backend answers 2xx.
    pub async fn health(&self) -> bool {
        let Ok(url) = self.endpoint("health") else {
            return false;
        };
        match self.client.get(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "health check failed");
                false
            }
        }
    }
}

impl AuthBackend for HttpAuthBackend {
    async fn current_user(&self, token: &str) -> Result<WireUser, ClientError> {
        let resp = self
            .client
            .get(self.endpoint("me")?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(send_error)?;
        read_json(resp).await
    }

    async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<LoginResponse, ClientError> {
        let resp = self
            .client
            .post(self.endpoint("login")?)
            .json(request)
            .send()
            .await
            .map_err(send_error)?;
        read_json(resp).await
    }

    async fn logout(&self, token: &str) -> Result<(), ClientError> {
        let resp = self
            .client
            .post(self.endpoint("logout")?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(send_error)?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(error_response(resp).await)
        }
    }

    async fn signup(
        &self,
        request: &SignupRequest,
    ) -> Result<SignupResponse, ClientError> {
        let resp = self
            .client
            .post(self.endpoint("signup")?)
            .json(request)
            .send()
            .await
            .map_err(send_error)?;
        read_json(resp).await
    }
}

/// Maps a failed send to "no response" or "timed out".
fn send_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Unreachable {
            detail: e.to_string(),
        }
    }
}

/// Decodes a 2xx body as `T`, or turns an error status into
/// [`ClientError::Api`].
async fn read_json<T: DeserializeOwned>(
    resp: Response,
) -> Result<T, ClientError> {
    if !resp.status().is_success() {
        return Err(error_response(resp).await);
    }
    resp.json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

/// Builds an [`ClientError::Api`] from an error response, keeping the
/// server's `message` and field `errors` when the body is a JSON error
/// object.
async fn error_response(resp: Response) -> ClientError {
    let status = resp.status().as_u16();
    // Error bodies are not always JSON (proxies, HTML error pages).
    let body: ErrorBody = resp.json().await.unwrap_or_default();
    tracing::debug!(status, message = ?body.message, "auth service error");
    ClientError::Api {
        status,
        message: body.message,
        errors: body.errors,
    }
}
