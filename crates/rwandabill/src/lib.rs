//! # RwandaBill sessions
//!
//! Authentication and role-based routing for the RwandaBill
//! utility-billing app (water, sanitation, security services).
//!
//! The facade re-exports the sub-crates and adds the pieces an app shell
//! needs on top of a [`SessionManager`]: a [`SessionBuilder`], the
//! role → landing-route mapping, a one-shot [`Redirector`], and a route
//! [`guard`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rwandabill::prelude::*;
//!
//! # async fn run() -> Result<(), RwandabillError> {
//! let mut session = SessionBuilder::new()
//!     .base_url("http://localhost:8080")
//!     .build(MemoryTokenStore::new())?;
//! let mut redirects = Redirector::new(session.subscribe());
//!
//! session.check_auth().await?;
//! session.login("water.admin@example.com", "admin123").await?;
//!
//! if let Some(route) = redirects.poll() {
//!     println!("go to {route}");
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
pub mod routes;

pub use builder::SessionBuilder;
pub use error::RwandabillError;
pub use routes::{Access, LandingRoute, Redirector, guard};

pub use rwandabill_client as client;
pub use rwandabill_protocol as protocol;
pub use rwandabill_session as session;

/// Everything an app shell typically needs, in one import.
pub mod prelude {
    pub use crate::{
        Access, LandingRoute, Redirector, RwandabillError, SessionBuilder, guard,
    };

    pub use rwandabill_client::{
        AuthBackend, ClientError, HttpAuthBackend, HttpConfig, OfflineBackend,
    };
    pub use rwandabill_protocol::{Identity, Role, ServiceKind, SignupForm};
    pub use rwandabill_session::{
        BootstrapOutcome, FileTokenStore, LoginOutcome, MemoryTokenStore,
        MockDirectory, RunMode, SessionConfig, SessionError, SessionManager,
        SessionState, SignupResult, TokenStore,
    };
}
