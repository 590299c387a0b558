//! Identity types and wire payloads for RwandaBill.
//!
//! This crate defines the "language" spoken with the remote auth service:
//!
//! - **Types** ([`Role`], [`ServiceKind`], [`Identity`]): the internal
//!   vocabulary every other layer works with.
//! - **Wire** ([`WireUser`], [`LoginRequest`], [`SignupRequest`], ...):
//!   the JSON bodies that travel to and from the server, plus the
//!   normalization that turns them into an [`Identity`].
//! - **Errors** ([`ProtocolError`]): what can be wrong with a payload.
//!
//! # Architecture
//!
//! ```text
//! Client (HTTP bytes) → Protocol (WireUser → Identity) → Session (who is logged in)
//! ```
//!
//! The protocol layer doesn't know about connections or sessions. It only
//! knows how payloads look and how the two role vocabularies map onto
//! each other.

mod error;
mod types;
mod wire;

pub use error::ProtocolError;
pub use types::{DEFAULT_GROUP, Identity, Role, ServiceKind};
pub use wire::{
    ErrorBody, LoginRequest, LoginResponse, SignupForm, SignupRequest,
    SignupResponse, WireId, WireUser, normalize_email,
};
