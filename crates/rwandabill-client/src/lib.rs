//! Remote auth service contract for RwandaBill.
//!
//! Provides the [`AuthBackend`] trait, which abstracts over whatever
//! actually answers login, logout, signup, and "who am I" requests, and
//! the implementations that ship with the crate.
//!
//! # Feature Flags
//!
//! - `http` (default): [`HttpAuthBackend`], a `reqwest` client for the
//!   RwandaBill REST API

mod config;
mod error;
#[cfg(feature = "http")]
mod http;
mod offline;

pub use config::HttpConfig;
pub use error::ClientError;
#[cfg(feature = "http")]
pub use http::HttpAuthBackend;
pub use offline::OfflineBackend;

use std::future::Future;

use rwandabill_protocol::{
    LoginRequest, LoginResponse, SignupRequest, SignupResponse, WireUser,
};

/// The remote auth service, seen as a black box.
///
/// Every method is a single request/response exchange. Implementations
/// report failure through [`ClientError`] and never retry on their own;
/// deciding what a failure *means* (fall back, reset, surface) is the
/// session layer's job.
///
/// # Trait bounds
///
/// - `Send + Sync` → one backend can serve every task in the process.
/// - `'static` → it lives as long as the session manager that owns it.
pub trait AuthBackend: Send + Sync + 'static {
    /// `GET /me`: resolves a bearer token to its user profile.
    fn current_user(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<WireUser, ClientError>> + Send;

    /// `POST /login`: exchanges credentials for a token and profile.
    ///
    /// A success status with a body missing its token still returns
    /// `Ok`; callers must validate the [`LoginResponse`].
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, ClientError>> + Send;

    /// `POST /logout`: invalidates the token server-side.
    fn logout(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// `POST /signup`: registers a new account.
    fn signup(
        &self,
        request: &SignupRequest,
    ) -> impl Future<Output = Result<SignupResponse, ClientError>> + Send;
}
