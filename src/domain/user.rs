//! Accounts, roles and sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an account in the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Borrows the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an account is allowed to see. Unknown or missing roles read as
/// `Student`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Files and tracks their own complaints.
    #[default]
    Student,
    /// Triages every complaint.
    Admin,
}

impl Role {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Admin => "Admin",
        }
    }

    /// The other role.
    pub fn toggle(self) -> Self {
        match self {
            Role::Student => Role::Admin,
            Role::Admin => Role::Student,
        }
    }

    /// Parses a stored role, defaulting to `Student`.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(r) if r.eq_ignore_ascii_case("admin") => Role::Admin,
            _ => Role::Student,
        }
    }
}

/// The signed-in account as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Account id.
    pub user_id: UserId,
    /// Sign-in email.
    pub email: String,
    /// Display name from the profile.
    pub name: String,
    /// Role from the profile.
    pub role: Role,
}

impl Session {
    /// Whether the account may use the admin dashboard.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Sign-up form contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Sign-in email.
    pub email: String,
    /// Clear-text password; hashed by the provider.
    pub password: String,
    /// Requested role.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_roles_default_to_student() {
        assert_eq!(Role::from_stored(Some("admin")), Role::Admin);
        assert_eq!(Role::from_stored(Some(" Admin ")), Role::Admin);
        assert_eq!(Role::from_stored(Some("staff")), Role::Student);
        assert_eq!(Role::from_stored(None), Role::Student);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
