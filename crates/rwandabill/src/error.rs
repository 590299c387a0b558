//! Unified error type for RwandaBill.

use rwandabill_client::ClientError;
use rwandabill_protocol::ProtocolError;
use rwandabill_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `rwandabill` facade you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant lets `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum RwandabillError {
    /// A payload-level error (missing field, unknown role).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A transport-level error (unreachable, timeout, error status).
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A session-level error (invalid credentials, token store).
    #[error(transparent)]
    Session(#[from] SessionError),
}
