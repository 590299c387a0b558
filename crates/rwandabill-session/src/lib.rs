//! Session management for RwandaBill.
//!
//! This crate handles the lifecycle of the logged-in user:
//!
//! 1. **Bootstrap**: resolving a persisted token on start
//!    ([`SessionManager::check_auth`])
//! 2. **Login / logout / signup**: remote first, with a development-only
//!    fallback to an in-memory [`MockDirectory`]
//! 3. **Persistence**: keeping the token across restarts ([`TokenStore`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Facade (above)  ← routes users to a dashboard based on the session
//!     ↕
//! Session Layer (this crate)  ← decides who is logged in
//!     ↕
//! Client Layer (below)  ← talks to the remote auth service
//! ```

mod error;
mod manager;
mod mock;
mod session;
mod store;

pub use error::SessionError;
pub use manager::SessionManager;
pub use mock::{
    MockCredential, MockDirectory, generate_mock_token, placeholder_identity,
};
pub use session::{
    BootstrapOutcome, LoginOutcome, RunMode, SessionConfig, SessionState,
    SignupResult,
};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
