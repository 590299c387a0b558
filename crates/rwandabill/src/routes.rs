//! Role-based routing on top of the session state.
//!
//! Three pieces, all read-only consumers of [`SessionState`]:
//!
//! - [`LandingRoute::for_role`]: where a user lands after authenticating.
//! - [`Redirector`]: applies that mapping exactly once per resolution.
//! - [`guard`]: decides whether a page restricted to some roles may render.

use std::fmt;

use rwandabill_protocol::Role;
use rwandabill_session::SessionState;
use tokio::sync::watch;

// ---------------------------------------------------------------------------
// LandingRoute
// ---------------------------------------------------------------------------

/// A top-level destination in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandingRoute {
    /// `/`
    Home,
    /// `/dashboard`, for members.
    Dashboard,
    /// `/admin`, for service admins.
    Admin,
    /// `/superadmin`
    SuperAdmin,
    /// `/login`
    Login,
}

impl LandingRoute {
    /// Where a user with `role` lands after login or bootstrap.
    /// No role means the public home page.
    pub fn for_role(role: Option<Role>) -> Self {
        match role {
            Some(Role::SuperAdmin) => Self::SuperAdmin,
            Some(Role::Admin) => Self::Admin,
            Some(Role::Member) => Self::Dashboard,
            None => Self::Home,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Dashboard => "/dashboard",
            Self::Admin => "/admin",
            Self::SuperAdmin => "/superadmin",
            Self::Login => "/login",
        }
    }
}

impl fmt::Display for LandingRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// ---------------------------------------------------------------------------
// Redirector
// ---------------------------------------------------------------------------

/// Turns session resolutions into one-shot redirects.
///
/// Every time the session resolves to an identity (a login, or a bootstrap
/// that restored a token) the redirector yields that identity's landing
/// route once. It stays silent while the session is loading, while it is
/// anonymous, and for a resolution it has already yielded.
///
/// ```rust,no_run
/// # use rwandabill::prelude::*;
/// # async fn run(mut session: SessionManager<HttpAuthBackend, MemoryTokenStore>) {
/// let mut redirects = Redirector::new(session.subscribe());
/// let _ = session.login("user@example.com", "user123").await;
/// assert_eq!(redirects.poll(), Some(LandingRoute::Dashboard));
/// assert_eq!(redirects.poll(), None);
/// # }
/// ```
#[derive(Debug)]
pub struct Redirector {
    rx: watch::Receiver<SessionState>,
    /// The last `resolution` a route was yielded for.
    applied: u64,
}

impl Redirector {
    pub fn new(rx: watch::Receiver<SessionState>) -> Self {
        Self { rx, applied: 0 }
    }

    /// Returns the pending redirect, if the current state has one.
    pub fn poll(&mut self) -> Option<LandingRoute> {
        // Copy out so the watch read lock is released before returning.
        let (loading, resolution, role) = {
            let state = self.rx.borrow_and_update();
            (
                state.loading,
                state.resolution,
                state.user.as_ref().map(|u| u.role()),
            )
        };

        if loading || resolution == self.applied {
            return None;
        }
        let role = role?;
        self.applied = resolution;
        tracing::debug!(resolution, role = %role, "redirecting after authentication");
        Some(LandingRoute::for_role(Some(role)))
    }

    /// Waits for the next redirect.
    ///
    /// Returns `None` once the session manager has been dropped.
    pub async fn next(&mut self) -> Option<LandingRoute> {
        loop {
            if let Some(route) = self.poll() {
                return Some(route);
            }
            if self.rx.changed().await.is_err() {
                return None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Guard
// ---------------------------------------------------------------------------

/// The verdict of [`guard`] for a protected page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Render the page.
    Granted,
    /// The session is still resolving; render a spinner.
    Loading,
    /// Nobody is logged in; go to [`LandingRoute::Login`].
    Login,
    /// Logged in with the wrong role; go to the user's own landing route.
    Forbidden(LandingRoute),
}

/// Checks whether the current session may see a page restricted to
/// `required`. An empty `required` admits any authenticated user.
pub fn guard(state: &SessionState, required: &[Role]) -> Access {
    if state.loading {
        return Access::Loading;
    }
    let Some(user) = state.user.as_ref() else {
        return Access::Login;
    };
    if required.is_empty() || user.has_any_role(required) {
        Access::Granted
    } else {
        Access::Forbidden(LandingRoute::for_role(Some(user.role())))
    }
}
