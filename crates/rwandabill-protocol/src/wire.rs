//! Payloads exchanged with the remote auth service.
//!
//! Everything here is camelCase on the wire and lenient on input: any
//! field the server might leave out is an `Option`, and the conversion
//! into [`Identity`] decides what is a default and what is fatal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_GROUP, Identity, ProtocolError, Role, ServiceKind};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// A user id as the server sends it: a JSON number from the database or
/// an already-stringified id.
///
/// `#[serde(untagged)]` tries each variant in order, so `42` and `"42"`
/// both parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The user profile returned by `GET /me`, and nested in login responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub approved: Option<bool>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}

impl TryFrom<WireUser> for Identity {
    type Error = ProtocolError;

    /// Normalizes a server profile.
    ///
    /// `id` and `role` are required. The role is lowercased into the
    /// internal vocabulary; the service survives only for admins and only
    /// if it names a known service. Everything else falls back to a
    /// default.
    fn try_from(wire: WireUser) -> Result<Self, Self::Error> {
        let id = wire.id.ok_or(ProtocolError::MissingField("id"))?;
        let role = wire
            .role
            .as_deref()
            .ok_or(ProtocolError::MissingField("role"))
            .and_then(Role::from_wire)?;
        let service = wire
            .service
            .as_deref()
            .and_then(|s| ServiceKind::parse(s).ok());

        let mut identity = Identity::new(id.to_string(), role, service);
        identity.full_name = wire.full_name.unwrap_or_default();
        identity.email = wire.email.unwrap_or_default();
        identity.telephone = wire.telephone.unwrap_or_default();
        identity.district = wire.district.unwrap_or_default();
        identity.sector = wire.sector.unwrap_or_default();
        identity.group =
            wire.group.unwrap_or_else(|| DEFAULT_GROUP.to_string());
        identity.approved = wire.approved.unwrap_or(true);
        identity.email_verified = wire.email_verified.unwrap_or(true);
        Ok(identity)
    }
}

impl From<&Identity> for WireUser {
    fn from(identity: &Identity) -> Self {
        Self {
            id: Some(WireId::Text(identity.id.clone())),
            full_name: Some(identity.full_name.clone()),
            email: Some(identity.email.clone()),
            telephone: Some(identity.telephone.clone()),
            district: Some(identity.district.clone()),
            sector: Some(identity.sector.clone()),
            role: Some(identity.role().wire_name().to_string()),
            service: identity.service().map(|s| s.wire_name().to_string()),
            group: Some(identity.group.clone()),
            approved: Some(identity.approved),
            email_verified: Some(identity.email_verified),
        }
    }
}

/// Body of a successful `POST /login`.
///
/// The expected envelope nests the profile under `user`:
/// `{"token": "...", "user": {"id": 1, "role": "USER", ...}}`. A flat body
/// with the profile fields beside `token` decodes with `user: None` and is
/// rejected as malformed.
///
/// Both fields are optional so that a 200 response with a missing token
/// still decodes; [`LoginResponse::into_session`] then rejects it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<WireUser>,
}

impl LoginResponse {
    /// Splits a well-formed response into its token and identity.
    ///
    /// # Errors
    /// [`ProtocolError::MissingField`] when the token or user is absent
    /// (an empty token counts as absent), or any error from identity
    /// normalization.
    pub fn into_session(self) -> Result<(String, Identity), ProtocolError> {
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .ok_or(ProtocolError::MissingField("token"))?;
        let user = self.user.ok_or(ProtocolError::MissingField("user"))?;
        Ok((token, Identity::try_from(user)?))
    }
}

/// Body of a successful `POST /signup`. Only the message is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body the server attaches to 4xx/5xx responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    /// Field-level validation errors, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Body of `POST /login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Trims and lowercases the email. The password is kept verbatim.
    pub fn normalized(email: &str, password: &str) -> Self {
        Self {
            email: normalize_email(email),
            password: password.to_string(),
        }
    }
}

// Passwords must not end up in logs via `{:?}`.
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration data in the internal vocabulary, as a sign-up form
/// collects it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub telephone: String,
    pub district: String,
    pub sector: String,
    pub password: String,
    /// Defaults to [`Role::Member`] when `None`.
    pub role: Option<Role>,
    /// Required when the role is [`Role::Admin`], ignored otherwise.
    pub service: Option<ServiceKind>,
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl SignupForm {
    /// The role this form registers, after defaulting.
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or(Role::Member)
    }

    /// Translates the form into the server's vocabulary.
    ///
    /// # Errors
    /// [`ProtocolError::MissingField`]`("service")` for an admin
    /// registration without a service.
    pub fn to_request(&self) -> Result<SignupRequest, ProtocolError> {
        let role = self.effective_role();
        let service = match role {
            Role::Admin => Some(
                self.service
                    .ok_or(ProtocolError::MissingField("service"))?
                    .wire_name()
                    .to_string(),
            ),
            Role::Member | Role::SuperAdmin => None,
        };
        Ok(SignupRequest {
            full_name: self.full_name.trim().to_string(),
            email: normalize_email(&self.email),
            telephone: self.telephone.trim().to_string(),
            district: self.district.clone(),
            sector: self.sector.clone(),
            password: self.password.clone(),
            role: role.wire_name().to_string(),
            service,
        })
    }
}

/// Body of `POST /signup`, in the server's vocabulary.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub telephone: String,
    pub district: String,
    pub sector: String,
    pub password: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

/// Trims surrounding whitespace and lowercases.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_user(role: &str) -> WireUser {
        WireUser {
            id: Some(WireId::Number(12)),
            role: Some(role.into()),
            ..WireUser::default()
        }
    }

    #[test]
    fn test_identity_from_wire_normalizes_role_and_defaults() {
        let identity = Identity::try_from(wire_user("SUPER_ADMIN")).unwrap();

        assert_eq!(identity.id, "12");
        assert_eq!(identity.role(), Role::SuperAdmin);
        assert_eq!(identity.group, DEFAULT_GROUP);
        assert!(identity.approved);
        assert!(identity.email_verified);
        assert_eq!(identity.full_name, "");
    }

    #[test]
    fn test_identity_from_wire_keeps_service_only_for_admin() {
        let mut admin = wire_user("ADMIN");
        admin.service = Some("SANITATION".into());
        let mut member = wire_user("USER");
        member.service = Some("WATER".into());

        let admin = Identity::try_from(admin).unwrap();
        let member = Identity::try_from(member).unwrap();

        assert_eq!(admin.service(), Some(ServiceKind::Sanitation));
        assert_eq!(member.service(), None);
    }

    #[test]
    fn test_identity_from_wire_unknown_service_is_dropped() {
        let mut admin = wire_user("ADMIN");
        admin.service = Some("ELECTRICITY".into());

        let admin = Identity::try_from(admin).unwrap();
        assert_eq!(admin.service(), None);
    }

    #[test]
    fn test_identity_from_wire_missing_id_or_role_fails() {
        let no_id = WireUser {
            role: Some("USER".into()),
            ..WireUser::default()
        };
        let no_role = WireUser {
            id: Some(WireId::Text("a".into())),
            ..WireUser::default()
        };

        assert_eq!(
            Identity::try_from(no_id),
            Err(ProtocolError::MissingField("id"))
        );
        assert_eq!(
            Identity::try_from(no_role),
            Err(ProtocolError::MissingField("role"))
        );
    }

    #[test]
    fn test_identity_from_wire_respects_explicit_flags() {
        let mut pending = wire_user("USER");
        pending.approved = Some(false);
        pending.email_verified = Some(false);
        pending.group = Some("Group C".into());

        let identity = Identity::try_from(pending).unwrap();
        assert!(!identity.approved);
        assert!(!identity.email_verified);
        assert_eq!(identity.group, "Group C");
    }

    #[test]
    fn test_wire_user_parses_numeric_and_string_ids() {
        let numeric: WireUser =
            serde_json::from_str(r#"{"id": 5, "role": "USER"}"#).unwrap();
        let text: WireUser =
            serde_json::from_str(r#"{"id": "u-5", "role": "USER"}"#).unwrap();

        assert_eq!(numeric.id, Some(WireId::Number(5)));
        assert_eq!(text.id, Some(WireId::Text("u-5".into())));
    }

    #[test]
    fn test_wire_user_from_identity_keeps_id_role_and_service() {
        let admin = Identity::new("3", Role::Admin, Some(ServiceKind::Water));
        let back = Identity::try_from(WireUser::from(&admin)).unwrap();
        assert_eq!(back, admin);
    }

    #[test]
    fn test_login_response_missing_token_is_malformed() {
        let resp = LoginResponse {
            token: None,
            user: Some(wire_user("USER")),
        };
        assert_eq!(
            resp.into_session().unwrap_err(),
            ProtocolError::MissingField("token")
        );

        let empty = LoginResponse {
            token: Some(String::new()),
            user: Some(wire_user("USER")),
        };
        assert!(empty.into_session().is_err());
    }

    #[test]
    fn test_login_response_well_formed_splits() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{"token": "jwt", "user": {"id": 1, "role": "ADMIN", "service": "WATER"}}"#,
        )
        .unwrap();

        let (token, identity) = resp.into_session().unwrap();
        assert_eq!(token, "jwt");
        assert_eq!(identity.role(), Role::Admin);
        assert_eq!(identity.service(), Some(ServiceKind::Water));
    }

    #[test]
    fn test_login_response_flat_body_is_malformed() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{"token": "jwt", "id": 1, "email": "a@example.com", "role": "USER"}"#,
        )
        .unwrap();

        assert_eq!(
            resp.into_session().unwrap_err(),
            ProtocolError::MissingField("user")
        );
    }

    #[test]
    fn test_login_request_normalizes_email_only() {
        let req = LoginRequest::normalized("  User@Example.COM ", " Pa55 ");
        assert_eq!(req.email, "user@example.com");
        assert_eq!(req.password, " Pa55 ");
    }

    #[test]
    fn test_login_request_debug_redacts_password() {
        let req = LoginRequest::normalized("a@b.c", "hunter2");
        assert!(!format!("{req:?}").contains("hunter2"));
    }

    #[test]
    fn test_signup_form_defaults_to_member() {
        let form = SignupForm {
            email: "New@Example.com".into(),
            ..SignupForm::default()
        };

        let req = form.to_request().unwrap();
        assert_eq!(req.role, "USER");
        assert_eq!(req.email, "new@example.com");
        assert_eq!(req.service, None);
    }

    #[test]
    fn test_signup_form_admin_requires_service() {
        let form = SignupForm {
            role: Some(Role::Admin),
            ..SignupForm::default()
        };
        assert_eq!(
            form.to_request().unwrap_err(),
            ProtocolError::MissingField("service")
        );
    }

    #[test]
    fn test_signup_form_admin_forwards_uppercase_service() {
        let form = SignupForm {
            role: Some(Role::Admin),
            service: Some(ServiceKind::Security),
            ..SignupForm::default()
        };

        let req = form.to_request().unwrap();
        assert_eq!(req.role, "ADMIN");
        assert_eq!(req.service.as_deref(), Some("SECURITY"));

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["fullName"], "");
        assert_eq!(json["service"], "SECURITY");
    }

    #[test]
    fn test_signup_form_member_never_sends_service() {
        let form = SignupForm {
            role: Some(Role::SuperAdmin),
            service: Some(ServiceKind::Water),
            ..SignupForm::default()
        };

        let req = form.to_request().unwrap();
        assert_eq!(req.role, "SUPER_ADMIN");
        assert!(req.service.is_none());
    }

    #[test]
    fn test_error_body_tolerates_missing_message() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.message, None);
    }
}
