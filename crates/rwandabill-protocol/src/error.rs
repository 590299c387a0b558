//! Error types for the protocol layer.
//!
//! Each crate in RwandaBill defines its own error enum. A `ProtocolError`
//! always means a payload from (or for) the auth service did not have the
//! shape we expect. It never means the network failed.

/// Errors raised while translating between wire payloads and domain types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A field the identity cannot be built without was absent.
    ///
    /// The server omits optional descriptive fields all the time (those get
    /// defaults), but an identity with no `id` or no `role` is unusable.
    #[error("malformed payload: missing `{0}`")]
    MissingField(&'static str),

    /// The role string matched neither the server vocabulary
    /// (`USER`/`ADMIN`/`SUPER_ADMIN`) nor the internal one
    /// (`member`/`admin`/`superadmin`).
    #[error("unknown role `{0}`")]
    UnknownRole(String),

    /// The service string is not one of `water`, `sanitation`, `security`.
    #[error("unknown service `{0}`")]
    UnknownService(String),
}
