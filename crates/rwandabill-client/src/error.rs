/// Errors that can occur while talking to the remote auth service.
///
/// The variants follow how a request can fail from the caller's point of
/// view: it never got an answer, it got an error answer, or it got an
/// answer we could not read.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, refused connection,
    /// TLS failure, ...). `detail` holds the underlying cause for logs.
    #[error("No response from server. Please check your connection.")]
    Unreachable { detail: String },

    /// The request did not finish within the configured timeout.
    #[error("request to auth service timed out")]
    Timeout,

    /// The server answered with a non-success status.
    ///
    /// `message` is the server's own explanation, when the error body
    /// carried one. `errors` holds field-level validation failures
    /// exactly as the server sent them.
    #[error("{}", .message.as_deref().unwrap_or("An error occurred"))]
    Api {
        status: u16,
        message: Option<String>,
        errors: Option<serde_json::Value>,
    },

    /// The server answered with a success status but the body could not
    /// be decoded.
    #[error("unreadable response from auth service: {0}")]
    Decode(String),

    /// The configured base URL is not a valid absolute URL.
    #[error("invalid auth service URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// The `message` field of the server's error body, if there was one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Field-level validation errors from the server's error body, e.g.
    /// `{"email": "must be a well-formed email address"}`.
    pub fn field_errors(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Api { errors, .. } => errors.as_ref(),
            _ => None,
        }
    }

    /// HTTP status of an error response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_server_message() {
        let err = ClientError::Api {
            status: 401,
            message: Some("Invalid email or password".into()),
            errors: None,
        };
        assert_eq!(err.to_string(), "Invalid email or password");
        assert_eq!(err.server_message(), Some("Invalid email or password"));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_api_error_without_message_uses_generic_text() {
        let err = ClientError::Api {
            status: 500,
            message: None,
            errors: None,
        };
        assert_eq!(err.to_string(), "An error occurred");
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_api_error_exposes_field_errors() {
        let err = ClientError::Api {
            status: 400,
            message: Some("Validation failed".into()),
            errors: Some(serde_json::json!({ "telephone": "is required" })),
        };
        let errors = err.field_errors().expect("errors should be kept");
        assert_eq!(errors["telephone"], "is required");
        assert_eq!(err.to_string(), "Validation failed");
    }

    #[test]
    fn test_field_errors_absent_for_transport_failures() {
        assert!(ClientError::Timeout.field_errors().is_none());
    }

    #[test]
    fn test_unreachable_hides_detail_from_display() {
        let err = ClientError::Unreachable {
            detail: "tcp connect error: refused".into(),
        };
        assert!(err.to_string().starts_with("No response from server"));
        assert_eq!(err.status(), None);
    }
}
