//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Role;
use crate::config::{MAX_NAME_LENGTH, NAME_TOO_LONG_MESSAGE};
use crate::errors::{AppError, AppResult};

/// User domain entity
///
/// Password and authentication fields live with the identity provider,
/// not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Apply an already validated set of changes.
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(role) = changes.role {
            self.role = role;
        }
    }
}

/// Data for inserting a user record.
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewUser {
    /// New user stamped with the current time.
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role,
            created_at: Some(Utc::now()),
        }
    }
}

/// Trim a submitted name and check its length.
///
/// `None` means the name was blank and should be left alone.
pub fn normalize_name(raw: &str) -> AppResult<Option<String>> {
    let name = raw.trim();
    if name.is_empty() {
        return Ok(None);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::bad_request(NAME_TOO_LONG_MESSAGE));
    }
    Ok(Some(name.to_string()))
}

/// Raw update input as received from a caller.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub role: Option<String>,
}

/// Validated update delta.
///
/// Built from [`UpdateUser`] only when every provided field is valid, so a
/// rejected role can never leave a half-applied name change behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub role: Option<Role>,
}

impl UserChanges {
    /// Validate all fields of an update before anything is applied.
    ///
    /// A blank or missing name is not an error; it just leaves the name alone.
    pub fn parse(input: UpdateUser) -> AppResult<Self> {
        let name = input
            .name
            .as_deref()
            .map(normalize_name)
            .transpose()?
            .flatten();

        let role = input.role.as_deref().map(str::parse::<Role>).transpose()?;

        Ok(Self { name, role })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none()
    }
}

/// Public projection of a user returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Unique user identifier
    #[schema(example = 42)]
    pub id: i32,
    /// User display name
    #[schema(example = "Anne Smith")]
    pub name: String,
    /// User email address
    #[schema(example = "anne@example.com")]
    pub email: String,
    /// User role
    pub role: Role,
    /// Account creation timestamp (ISO-8601), if known
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
