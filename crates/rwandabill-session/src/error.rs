//! Error types for the session layer.

use rwandabill_client::ClientError;
use rwandabill_protocol::ProtocolError;

/// Errors that can occur while resolving, opening, or closing a session.
///
/// The `Display` text of the user-facing variants is meant to be shown
/// as-is on a login or sign-up form.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Neither the remote service nor the mock directory accepted the
    /// credentials.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Production login failed. The text is the server's own message
    /// when it sent one, a generic hint otherwise.
    #[error("{0}")]
    LoginRejected(String),

    /// Production sign-up failed, with the same message policy as
    /// [`LoginRejected`](Self::LoginRejected).
    #[error("{0}")]
    SignupRejected(String),

    /// The mock directory already holds an account with this email.
    #[error("An account with this email already exists")]
    EmailTaken,

    /// An admin registration did not name the service to manage.
    #[error("Service is required for admin registration")]
    ServiceRequired,

    /// The remote call failed outright.
    #[error(transparent)]
    Backend(#[from] ClientError),

    /// The remote call succeeded but its body was unusable.
    #[error(transparent)]
    Malformed(#[from] ProtocolError),

    /// Reading or writing the persisted token failed.
    #[error("token store failure: {0}")]
    Store(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(
            SessionError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_from_client_error_is_transparent() {
        let err: SessionError = ClientError::Api {
            status: 401,
            message: Some("Bad token".into()),
            errors: None,
        }
        .into();
        assert!(matches!(err, SessionError::Backend(_)));
        assert_eq!(err.to_string(), "Bad token");
    }

    #[test]
    fn test_from_protocol_error() {
        let err: SessionError = ProtocolError::MissingField("token").into();
        assert!(matches!(err, SessionError::Malformed(_)));
    }
}
