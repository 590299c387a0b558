//! The development-only mock credential directory.
//!
//! When the remote auth service is unreachable in development, login and
//! sign-up fall back to this in-memory table. It is seeded once when
//! constructed and grows when sign-up falls back to it. Nothing is
//! persisted: a restart brings back the seed.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rwandabill_protocol::{Identity, Role, ServiceKind, normalize_email};

use crate::SessionError;

// Placeholder contact fields for identities that never came from a server.
const PLACEHOLDER_TELEPHONE: &str = "+250788123456";
const PLACEHOLDER_DISTRICT: &str = "Kigali";
const PLACEHOLDER_SECTOR: &str = "Nyarugenge";

/// One row of the mock directory.
#[derive(Clone, PartialEq, Eq)]
pub struct MockCredential {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub service: Option<ServiceKind>,
    pub approved: bool,
    pub email_verified: bool,
}

impl std::fmt::Debug for MockCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCredential")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("service", &self.service)
            .field("approved", &self.approved)
            .finish_non_exhaustive()
    }
}

impl MockCredential {
    /// An approved, verified record.
    pub fn new(
        email: &str,
        password: &str,
        role: Role,
        service: Option<ServiceKind>,
    ) -> Self {
        Self {
            email: normalize_email(email),
            password: password.to_string(),
            role,
            service,
            approved: true,
            email_verified: true,
        }
    }
}

/// In-memory credential table for the development fallback.
///
/// Constructed once per process and handed to the session manager, which
/// owns it from then on.
#[derive(Debug, Clone)]
pub struct MockDirectory {
    records: Vec<MockCredential>,
}

impl Default for MockDirectory {
    /// The standard seed: one superadmin, one admin per service, and one
    /// member (`user@example.com` / `user123`).
    fn default() -> Self {
        Self::new(vec![
            MockCredential::new(
                "superadmin@example.com",
                "super123",
                Role::SuperAdmin,
                None,
            ),
            MockCredential::new(
                "water.admin@example.com",
                "admin123",
                Role::Admin,
                Some(ServiceKind::Water),
            ),
            MockCredential::new(
                "sanitation.admin@example.com",
                "admin123",
                Role::Admin,
                Some(ServiceKind::Sanitation),
            ),
            MockCredential::new(
                "security.admin@example.com",
                "admin123",
                Role::Admin,
                Some(ServiceKind::Security),
            ),
            MockCredential::new("user@example.com", "user123", Role::Member, None),
        ])
    }
}

impl MockDirectory {
    pub fn new(records: Vec<MockCredential>) -> Self {
        Self { records }
    }

    /// A directory with no accounts.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Finds the record matching `email` and `password` exactly, and
    /// returns the identity it stands for.
    ///
    /// `email` is expected to be normalized already.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<Identity> {
        self.records
            .iter()
            .position(|r| r.email == email && r.password == password)
            .map(|index| self.identity_at(index))
    }

    /// Appends an unapproved, unverified record.
    ///
    /// # Errors
    /// [`SessionError::EmailTaken`] if the email is already present.
    pub fn register(
        &mut self,
        email: &str,
        password: &str,
        role: Role,
        service: Option<ServiceKind>,
    ) -> Result<(), SessionError> {
        let email = normalize_email(email);
        if self.contains(&email) {
            return Err(SessionError::EmailTaken);
        }
        self.records.push(MockCredential {
            email,
            password: password.to_string(),
            role,
            service: if role == Role::Admin { service } else { None },
            approved: false,
            email_verified: false,
        });
        Ok(())
    }

    pub fn contains(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.records.iter().any(|r| r.email == email)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MockCredential] {
        &self.records
    }

    fn identity_at(&self, index: usize) -> Identity {
        let record = &self.records[index];
        let mut identity =
            Identity::new(format!("mock-{index}"), record.role, record.service);
        identity.full_name = placeholder_name(record.role);
        identity.email = record.email.clone();
        fill_placeholder_contact(&mut identity);
        identity.approved = record.approved;
        identity.email_verified = record.email_verified;
        identity
    }
}

/// The member that bootstrap keeps alive for the development sentinel
/// token.
pub fn placeholder_identity() -> Identity {
    let mut identity = Identity::new("mock-user", Role::Member, None);
    identity.full_name = placeholder_name(Role::Member);
    identity.email = "user@example.com".to_string();
    fill_placeholder_contact(&mut identity);
    identity
}

/// A fresh token for a fallback login: `mock-token-<millis>-<hex>`.
///
/// The random suffix keeps two logins within the same millisecond apart.
pub fn generate_mock_token() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let suffix: [u8; 4] = rand::rng().random();
    let hex: String = suffix.iter().map(|b| format!("{b:02x}")).collect();
    format!("mock-token-{millis}-{hex}")
}

fn placeholder_name(role: Role) -> String {
    match role {
        Role::Member => "Demo Member",
        Role::Admin => "Demo Admin",
        Role::SuperAdmin => "Demo Super Admin",
    }
    .to_string()
}

fn fill_placeholder_contact(identity: &mut Identity) {
    identity.telephone = PLACEHOLDER_TELEPHONE.to_string();
    identity.district = PLACEHOLDER_DISTRICT.to_string();
    identity.sector = PLACEHOLDER_SECTOR.to_string();
}
