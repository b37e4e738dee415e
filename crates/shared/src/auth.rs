//! Identity types carried by bearer tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Claims issued by the external identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID at the identity provider).
    pub sub: String,
    /// Login name.
    #[serde(rename = "cognito:username", default)]
    pub username: Option<String>,
    /// Groups the user belongs to.
    #[serde(rename = "cognito:groups", default)]
    pub groups: Vec<String>,
    /// Issuer.
    pub iss: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Resolves the role granted by these claims.
    ///
    /// Membership of `admin_group` grants [`UserRole::Admin`]; anything else,
    /// including a missing groups claim, is a plain user.
    #[must_use]
    pub fn role(&self, admin_group: &str) -> UserRole {
        if self.groups.iter().any(|g| g == admin_group) {
            UserRole::Admin
        } else {
            UserRole::User
        }
    }
}

/// Application role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access, including company and employee administration.
    Admin,
    /// Regular company user.
    User,
}

impl UserRole {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Returns true if this role may administer companies and employees.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Subject from the token.
    pub subject: String,
    /// Login name, when the token carries one.
    pub username: Option<String>,
    /// Resolved role.
    pub role: UserRole,
}
