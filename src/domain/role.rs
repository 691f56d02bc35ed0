//! User role enumeration and its single validation point.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{INVALID_ROLE_MESSAGE, ROLE_ADMIN, ROLE_EDITOR, ROLE_VIEWER};
use crate::errors::AppError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

impl Role {
    /// Stored and serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Editor => ROLE_EDITOR,
            Role::Viewer => ROLE_VIEWER,
        }
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Every role accepted as input goes through this parser.
///
/// Matching is exact: `"Admin"` or `" admin"` are rejected.
impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_EDITOR => Ok(Role::Editor),
            ROLE_VIEWER => Ok(Role::Viewer),
            _ => Err(AppError::bad_request(INVALID_ROLE_MESSAGE)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
