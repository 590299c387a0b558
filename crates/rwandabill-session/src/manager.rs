//! The session manager: owns the current session and every operation
//! that changes it.
//!
//! It is responsible for:
//! - Resolving the persisted token on start ([`check_auth`](SessionManager::check_auth))
//! - Logging in, remote first, mock directory second in development
//! - Persisting and erasing the token
//! - Logging out, which always succeeds locally
//! - Registering new accounts
//!
//! # Concurrency note
//!
//! Every operation takes `&mut self`, so two logins can never overlap on
//! the same manager: the borrow checker rejects it. Callers that share a
//! manager across tasks wrap it in a `tokio::sync::Mutex`, which queues
//! the calls; the later call then sees the state the earlier one left.
//! Observers never need the lock: state is published through a
//! `tokio::sync::watch` channel (see [`subscribe`](SessionManager::subscribe)).

use std::sync::Arc;

use rwandabill_client::{AuthBackend, ClientError};
use rwandabill_protocol::{
    Identity, LoginRequest, ProtocolError, Role, SignupForm,
};
use tokio::sync::watch;

use crate::mock::{generate_mock_token, placeholder_identity};
use crate::{
    BootstrapOutcome, LoginOutcome, MockDirectory, SessionConfig,
    SessionError, SessionState, SignupResult, TokenStore,
};

/// Shown when a production login fails without a server message.
const LOGIN_FAILED_HINT: &str =
    "Login failed. Please check your credentials and try again.";
/// Shown when a production sign-up fails without a server message.
const SIGNUP_FAILED_HINT: &str = "Registration failed. Please try again.";

const ADMIN_PENDING_MESSAGE: &str = "Registration successful! Your admin \
     account is awaiting approval by a super admin.";
const MEMBER_READY_MESSAGE: &str =
    "Registration successful! You can now log in.";
const MOCK_PENDING_MESSAGE: &str =
    "Registration successful! Your account is pending approval.";

/// Manages the one session of this process.
///
/// ## Lifecycle
///
/// ```text
///             check_auth()                      login()
/// [start] ──────────────→ [anonymous] ──────────────────→ [authenticated]
///    │                         ↑                                │
///    └──(token resolves)───────┼──────────→ [authenticated]     │
///                              └────────────── logout() ────────┘
/// ```
pub struct SessionManager<B: AuthBackend, S: TokenStore> {
    backend: B,
    store: S,
    directory: MockDirectory,
    config: SessionConfig,

    /// The published state. `Arc` lets the loading guard hold its own
    /// handle while the manager is mutably borrowed.
    state: Arc<watch::Sender<SessionState>>,
}

impl<B: AuthBackend, S: TokenStore> SessionManager<B, S> {
    /// Creates a manager in the unauthenticated state.
    ///
    /// Nothing is read from `store` until [`check_auth`](Self::check_auth).
    pub fn new(
        config: SessionConfig,
        backend: B,
        store: S,
        directory: MockDirectory,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            backend,
            store,
            directory,
            config,
            state: Arc::new(state),
        }
    }

    // =====================================================================
    // Bootstrap
    // =====================================================================

    /// Resolves the persisted token into a session.
    ///
    /// - No token → anonymous.
    /// - Token the remote service resolves → authenticated.
    /// - Remote failure with the development sentinel token → placeholder
    ///   member, still authenticated.
    /// - Any other failure → the token is erased and the session reset.
    ///   This is not an error.
    ///
    /// # Errors
    /// Only [`SessionError::Store`], when the token store cannot be read.
    pub async fn check_auth(&mut self) -> Result<BootstrapOutcome, SessionError> {
        let _loading = LoadingGuard::start(&self.state);

        let Some(token) = self.store.get()? else {
            self.publish_anonymous();
            tracing::debug!("no persisted token, session is anonymous");
            return Ok(BootstrapOutcome::Anonymous);
        };

        match self.fetch_identity(&token).await {
            Ok(identity) => {
                tracing::info!(
                    user_id = %identity.id,
                    role = %identity.role(),
                    "session restored"
                );
                self.publish_authenticated(token, identity.clone());
                Ok(BootstrapOutcome::Restored(identity))
            }
            Err(e)
                if self.config.mode.is_development()
                    && token == self.config.mock_token =>
            {
                tracing::warn!(
                    error = %e,
                    "current user unavailable, keeping mock session"
                );
                let identity = placeholder_identity();
                self.publish_authenticated(token, identity.clone());
                Ok(BootstrapOutcome::Placeholder(identity))
            }
            Err(e) => {
                tracing::info!(error = %e, "persisted token rejected, resetting session");
                if let Err(e) = self.store.clear() {
                    tracing::warn!(error = %e, "failed to erase rejected token");
                }
                self.publish_anonymous();
                Ok(BootstrapOutcome::Reset)
            }
        }
    }

    // =====================================================================
    // Login
    // =====================================================================

    /// Logs in with an email and password.
    ///
    /// The email is trimmed and lowercased; the password is sent as-is.
    /// The remote service is tried first. In development, any remote
    /// failure (including a success response without a token) falls back
    /// to the mock directory. In production it is surfaced instead.
    ///
    /// On failure the session is left exactly as it was.
    ///
    /// # Errors
    /// - [`SessionError::LoginRejected`]: production, remote failed
    /// - [`SessionError::InvalidCredentials`]: development, the mock
    ///   directory has no matching account either
    /// - [`SessionError::Store`]: the token could not be persisted
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, SessionError> {
        let _loading = LoadingGuard::start(&self.state);
        let request = LoginRequest::normalized(email, password);

        // Step 1: remote.
        let remote_error = match self.remote_login(&request).await {
            Ok((token, identity)) => {
                self.store.set(&token)?;
                tracing::info!(
                    user_id = %identity.id,
                    role = %identity.role(),
                    "login succeeded"
                );
                self.publish_authenticated(token, identity.clone());
                return Ok(LoginOutcome::Remote(identity));
            }
            Err(e) => e,
        };

        if !self.config.mode.is_development() {
            tracing::info!(error = %remote_error, "login rejected");
            return Err(SessionError::LoginRejected(user_message(
                &remote_error,
                LOGIN_FAILED_HINT,
            )));
        }

        // Step 2: mock directory.
        tracing::warn!(
            error = %remote_error,
            "remote login failed, falling back to mock directory"
        );
        let identity = self
            .directory
            .authenticate(&request.email, &request.password)
            .ok_or(SessionError::InvalidCredentials)?;

        let token = generate_mock_token();
        self.store.set(&token)?;
        tracing::info!(
            user_id = %identity.id,
            role = %identity.role(),
            "mock login succeeded"
        );
        self.publish_authenticated(token, identity.clone());
        Ok(LoginOutcome::Fallback(identity))
    }

    // =====================================================================
    // Logout
    // =====================================================================

    /// Logs out. Never fails.
    ///
    /// The remote invalidation call is best-effort and bounded by
    /// `config.logout_timeout`. Whatever it does, the persisted token is
    /// erased and the session reset.
    pub async fn logout(&mut self) {
        let token = self
            .state
            .borrow()
            .token
            .clone()
            .or_else(|| self.store.get().ok().flatten());

        if let Some(token) = token {
            let call = self.backend.logout(&token);
            match tokio::time::timeout(self.config.logout_timeout, call).await {
                Ok(Ok(())) => tracing::debug!("remote session invalidated"),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "remote logout failed, clearing locally");
                }
                Err(_) => {
                    tracing::warn!("remote logout timed out, clearing locally");
                }
            }
        }

        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to erase persisted token");
        }
        self.publish_anonymous();
        tracing::info!("logged out");
    }

    // =====================================================================
    // Signup
    // =====================================================================

    /// Registers a new account. Never fails; every failure comes back as
    /// `success: false` with a message for the form.
    ///
    /// Admin registrations must name a service. In development, a remote
    /// failure falls back to adding an unapproved record to the mock
    /// directory.
    pub async fn signup(&mut self, form: &SignupForm) -> SignupResult {
        let _loading = LoadingGuard::start(&self.state);
        match self.try_signup(form).await {
            Ok(message) => SignupResult::succeeded(message),
            Err(e) => {
                tracing::info!(error = %e, "signup failed");
                SignupResult::failed(e.to_string())
            }
        }
    }

    async fn try_signup(
        &mut self,
        form: &SignupForm,
    ) -> Result<&'static str, SessionError> {
        let request = form.to_request().map_err(|e| match e {
            ProtocolError::MissingField("service") => SessionError::ServiceRequired,
            other => SessionError::Malformed(other),
        })?;
        let role = form.effective_role();

        let remote_error = match self.backend.signup(&request).await {
            Ok(_) => {
                tracing::info!(role = %role, "account registered");
                return Ok(match role {
                    Role::Admin => ADMIN_PENDING_MESSAGE,
                    Role::Member | Role::SuperAdmin => MEMBER_READY_MESSAGE,
                });
            }
            Err(e) => e,
        };

        if !self.config.mode.is_development() {
            return Err(SessionError::SignupRejected(user_message(
                &SessionError::Backend(remote_error),
                SIGNUP_FAILED_HINT,
            )));
        }

        tracing::warn!(
            error = %remote_error,
            "remote signup failed, registering in mock directory"
        );
        self.directory.register(
            &request.email,
            &request.password,
            role,
            form.service,
        )?;
        Ok(MOCK_PENDING_MESSAGE)
    }

    // =====================================================================
    // Observation
    // =====================================================================

    /// A receiver that sees every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// A copy of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn directory(&self) -> &MockDirectory {
        &self.directory
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // =====================================================================
    // Internals
    // =====================================================================

    async fn fetch_identity(&self, token: &str) -> Result<Identity, SessionError> {
        let wire = self.backend.current_user(token).await?;
        Ok(Identity::try_from(wire)?)
    }

    /// One remote login attempt. A 2xx body without a token or user is an
    /// error, same as a transport failure.
    async fn remote_login(
        &self,
        request: &LoginRequest,
    ) -> Result<(String, Identity), SessionError> {
        let response = self.backend.login(request).await?;
        Ok(response.into_session()?)
    }

    fn publish_authenticated(&self, token: String, identity: Identity) {
        self.state.send_modify(|state| {
            state.token = Some(token);
            state.user = Some(identity);
            state.resolution += 1;
        });
    }

    fn publish_anonymous(&self) {
        self.state.send_modify(|state| {
            state.token = None;
            state.user = None;
        });
    }
}

/// Picks the text to show for a failed remote call: the server's own
/// message when it sent one, `fallback` otherwise.
fn user_message(error: &SessionError, fallback: &str) -> String {
    match error {
        SessionError::Backend(ClientError::Api {
            message: Some(message),
            ..
        }) if !message.trim().is_empty() => message.clone(),
        _ => fallback.to_string(),
    }
}

/// Raises `loading` for as long as it lives.
///
/// Dropping clears the flag, so it is cleared on every exit path: early
/// returns, `?`, and a future dropped mid-flight.
struct LoadingGuard {
    state: Arc<watch::Sender<SessionState>>,
}

impl LoadingGuard {
    fn start(state: &Arc<watch::Sender<SessionState>>) -> Self {
        state.send_modify(|s| s.loading = true);
        Self {
            state: Arc::clone(state),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.loading = false);
    }
}

// =========================================================================
// Tests
// =========================================================================
