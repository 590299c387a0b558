//! Core identity types shared by every layer.
//!
//! These are the *internal* vocabulary: a [`Role`] is `member`, `admin`,
//! or `superadmin`, always lowercase. The server speaks a different
//! vocabulary (`USER`/`ADMIN`/`SUPER_ADMIN`); translating between the two
//! happens here and only here, so the rest of the code never sees a raw
//! role string.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Default cohort label for identities the server sends without a group.
pub const DEFAULT_GROUP: &str = "Group A";

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Which dashboard (and which slice of the API) a user reaches.
///
/// `#[serde(rename_all = "lowercase")]` keeps the JSON form identical to
/// the internal vocabulary: `"member"`, `"admin"`, `"superadmin"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A household or business paying for utility services.
    Member,
    /// Manages one utility service (see [`ServiceKind`]).
    Admin,
    /// Manages admins across every service.
    SuperAdmin,
}

impl Role {
    /// Parses a role from either vocabulary, ignoring case.
    ///
    /// Accepts the server names (`USER`, `ADMIN`, `SUPER_ADMIN`), Spring
    /// authority names (`ROLE_USER`, ...), and the internal names
    /// (`member`, `admin`, `superadmin`).
    ///
    /// # Errors
    /// Returns [`ProtocolError::UnknownRole`] for anything else.
    pub fn from_wire(raw: &str) -> Result<Self, ProtocolError> {
        let lowered = raw.trim().to_ascii_lowercase();
        let name = lowered.strip_prefix("role_").unwrap_or(&lowered);
        match name {
            "user" | "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            "super_admin" | "superadmin" | "super-admin" => {
                Ok(Self::SuperAdmin)
            }
            _ => Err(ProtocolError::UnknownRole(raw.to_string())),
        }
    }

    /// The server's name for this role.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Member => "USER",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// The internal (lowercase) name for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::SuperAdmin => "superadmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ServiceKind
// ---------------------------------------------------------------------------

/// The utility domain an admin manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Water,
    Sanitation,
    Security,
}

impl ServiceKind {
    /// Parses a service name, ignoring case.
    ///
    /// # Errors
    /// Returns [`ProtocolError::UnknownService`] for unrecognized names.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "water" => Ok(Self::Water),
            "sanitation" => Ok(Self::Sanitation),
            "security" => Ok(Self::Security),
            _ => Err(ProtocolError::UnknownService(raw.to_string())),
        }
    }

    /// The server's (uppercase) enum name.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Water => "WATER",
            Self::Sanitation => "SANITATION",
            Self::Security => "SECURITY",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Sanitation => "sanitation",
            Self::Security => "security",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The authenticated user's resolved profile.
///
/// An identity is immutable once built. When the server sends a fresh
/// profile the whole value is replaced.
///
/// `role` and `service` are private: the only way to set them is
/// [`Identity::new`], which drops the service for anyone who is not an
/// admin. A member or superadmin therefore never carries a service.
///
/// Only `Serialize` is derived. Deserializing straight into an `Identity`
/// would bypass that check, so inbound payloads go through
/// [`WireUser`](crate::WireUser) instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub telephone: String,
    pub district: String,
    pub sector: String,
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<ServiceKind>,
    pub group: String,
    pub approved: bool,
    pub email_verified: bool,
}

impl Identity {
    /// Builds an identity with default descriptive fields.
    ///
    /// `service` is kept only when `role` is [`Role::Admin`].
    pub fn new(
        id: impl Into<String>,
        role: Role,
        service: Option<ServiceKind>,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: String::new(),
            email: String::new(),
            telephone: String::new(),
            district: String::new(),
            sector: String::new(),
            service: if role == Role::Admin { service } else { None },
            role,
            group: DEFAULT_GROUP.to_string(),
            approved: true,
            email_verified: true,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The managed service. Always `None` unless the role is admin.
    pub fn service(&self) -> Option<ServiceKind> {
        self.service
    }

    /// Returns `true` if this identity holds any of `roles`.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// Returns `true` if this identity holds `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_wire_accepts_server_vocabulary() {
        assert_eq!(Role::from_wire("USER").unwrap(), Role::Member);
        assert_eq!(Role::from_wire("ADMIN").unwrap(), Role::Admin);
        assert_eq!(Role::from_wire("SUPER_ADMIN").unwrap(), Role::SuperAdmin);
    }

    #[test]
    fn test_role_from_wire_ignores_case_and_authority_prefix() {
        assert_eq!(Role::from_wire("ROLE_USER").unwrap(), Role::Member);
        assert_eq!(Role::from_wire("Member").unwrap(), Role::Member);
        assert_eq!(Role::from_wire("SuperAdmin").unwrap(), Role::SuperAdmin);
        assert_eq!(Role::from_wire(" admin ").unwrap(), Role::Admin);
    }

    #[test]
    fn test_role_from_wire_unknown_returns_error() {
        assert_eq!(
            Role::from_wire("guest"),
            Err(ProtocolError::UnknownRole("guest".into()))
        );
    }

    #[test]
    fn test_role_wire_name_round_trips_through_from_wire() {
        for role in [Role::Member, Role::Admin, Role::SuperAdmin] {
            assert_eq!(Role::from_wire(role.wire_name()).unwrap(), role);
        }
    }

    #[test]
    fn test_role_display_is_lowercase() {
        assert_eq!(Role::SuperAdmin.to_string(), "superadmin");
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"superadmin\""
        );
    }

    #[test]
    fn test_service_parse_and_wire_name() {
        assert_eq!(ServiceKind::parse("Water").unwrap(), ServiceKind::Water);
        assert_eq!(ServiceKind::Sanitation.wire_name(), "SANITATION");
        assert!(ServiceKind::parse("electricity").is_err());
    }

    #[test]
    fn test_identity_new_drops_service_for_non_admin() {
        let member = Identity::new("1", Role::Member, Some(ServiceKind::Water));
        let boss =
            Identity::new("2", Role::SuperAdmin, Some(ServiceKind::Security));
        let admin = Identity::new("3", Role::Admin, Some(ServiceKind::Water));

        assert_eq!(member.service(), None);
        assert_eq!(boss.service(), None);
        assert_eq!(admin.service(), Some(ServiceKind::Water));
    }

    #[test]
    fn test_identity_new_applies_defaults() {
        let id = Identity::new("7", Role::Member, None);
        assert_eq!(id.group, DEFAULT_GROUP);
        assert!(id.approved);
        assert!(id.email_verified);
    }

    #[test]
    fn test_identity_serializes_camel_case_without_empty_service() {
        let json =
            serde_json::to_value(Identity::new("9", Role::Member, None))
                .unwrap();
        assert_eq!(json["role"], "member");
        assert!(json.get("service").is_none());
        assert_eq!(json["emailVerified"], true);
    }

    #[test]
    fn test_identity_has_role() {
        let admin = Identity::new("3", Role::Admin, None);
        assert!(admin.has_role(Role::Admin));
        assert!(admin.has_any_role(&[Role::Member, Role::Admin]));
        assert!(!admin.has_any_role(&[Role::SuperAdmin]));
    }
}
