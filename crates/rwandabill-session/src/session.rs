//! Session types: configuration, the observable session state, and the
//! tagged outcomes of each operation.
//!
//! A "session" is the pair of a persisted token and the identity it
//! resolved to. It tracks:
//! - WHO is logged in (`Identity`)
//! - WITH WHAT credential (the opaque token)
//! - WHETHER an operation is still in flight (`loading`)
//! - HOW MANY times authentication has resolved (`resolution`)

use std::fmt;
use std::time::Duration;

use rwandabill_protocol::Identity;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Which environment the session manager runs in.
///
/// This decides whether remote failures may fall back to the mock
/// directory. It is passed in explicitly, never read from the process
/// environment, so a test can exercise both behaviors side by side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Remote failures degrade to the mock directory.
    #[default]
    Development,

    /// Remote failures are surfaced to the caller. No fallback.
    Production,
}

impl RunMode {
    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Configuration for session behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Development or production.
    pub mode: RunMode,

    /// The sentinel token that bootstrap keeps alive (as a placeholder
    /// member) when the remote "current user" call fails in development.
    pub mock_token: String,

    /// How long logout waits for the remote invalidation call before
    /// giving up and clearing local state anyway.
    pub logout_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Development,
            mock_token: "mock-token".to_string(),
            logout_timeout: Duration::from_secs(5),
        }
    }
}

impl SessionConfig {
    /// Default settings with fallback disabled.
    pub fn production() -> Self {
        Self {
            mode: RunMode::Production,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// A snapshot of the session, as published to observers.
///
/// `user` is only ever `Some` while `token` is `Some`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The persisted credential. `None` means unauthenticated.
    pub token: Option<String>,

    /// The identity the token resolved to.
    pub user: Option<Identity>,

    /// `true` while bootstrap, login, or signup is in flight.
    pub loading: bool,

    /// Bumped once per successful authentication resolution (login or
    /// bootstrap yielding an identity). Observers compare it against the
    /// last value they acted on to react exactly once.
    pub resolution: u64,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

// Tokens are credentials; keep them out of `{:?}` output.
impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("loading", &self.loading)
            .field("resolution", &self.resolution)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// How a successful login was resolved.
///
/// Failures are the `Err` side of `login`'s result, so together this is
/// `Remote | Fallback | Failure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The remote service accepted the credentials.
    Remote(Identity),

    /// The remote call failed (development only) and the mock directory
    /// accepted the credentials.
    Fallback(Identity),
}

impl LoginOutcome {
    pub fn identity(&self) -> &Identity {
        match self {
            Self::Remote(identity) | Self::Fallback(identity) => identity,
        }
    }

    pub fn into_identity(self) -> Identity {
        match self {
            Self::Remote(identity) | Self::Fallback(identity) => identity,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// What bootstrap found in the token store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No token was persisted.
    Anonymous,

    /// The remote service resolved the token.
    Restored(Identity),

    /// The remote call failed, but the token is the development sentinel,
    /// so a placeholder member keeps the session alive.
    Placeholder(Identity),

    /// The token was rejected (or unresolvable) and has been erased.
    Reset,
}

impl BootstrapOutcome {
    /// The identity the session resolved to, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Restored(identity) | Self::Placeholder(identity) => {
                Some(identity)
            }
            Self::Anonymous | Self::Reset => None,
        }
    }
}

/// Result of a sign-up attempt. Sign-up never fails with an `Err`; every
/// failure is folded into `success: false` with a displayable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupResult {
    pub success: bool,
    pub message: String,
}

impl SignupResult {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
