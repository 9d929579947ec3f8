//! The closed role set and the monitor capability.
//!
//! # Purpose
//! Replaces the server's dynamic role strings with a closed enumeration so
//! every role check is exhaustively matched at compile time.
//!
//! # Key invariants
//! - `Role` is exactly `{Admin, Warden, Student}`; adding a role is a
//!   compile error everywhere it must be handled.
//! - Monitor is an orthogonal boolean capability grantable only to
//!   students, never a fourth role. It travels beside the role (see
//!   `LoginResponse::is_monitor`), not inside it.
//!
//! # Examples
//! ```rust
//! use hms_api::Role;
//!
//! let role: Role = "WARDEN".parse().expect("parse role");
//! assert_eq!(role, Role::Warden);
//! assert_eq!(role.as_str(), "WARDEN");
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user's single role, as issued by the server at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Warden,
    Student,
}

#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(String);

impl Role {
    /// The canonical wire string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Warden => "WARDEN",
            Role::Student => "STUDENT",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ADMIN" => Ok(Role::Admin),
            "WARDEN" => Ok(Role::Warden),
            "STUDENT" => Ok(Role::Student),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
