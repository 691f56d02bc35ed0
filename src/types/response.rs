use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{User, UserSummary};

/// Envelope for a single user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserSummary,
}

impl UserResponse {
    pub fn success(user: User) -> Self {
        Self {
            success: true,
            message: None,
            user: user.into(),
        }
    }

    pub fn with_message(user: User, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            user: user.into(),
        }
    }
}

/// Envelope for a list of users, `count` always equals `users.len()`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub success: bool,
    pub count: usize,
    pub users: Vec<UserSummary>,
}

impl UserListResponse {
    pub fn success(users: Vec<User>) -> Self {
        let users: Vec<UserSummary> = users.into_iter().map(UserSummary::from).collect();
        Self {
            success: true,
            count: users.len(),
            users,
        }
    }
}

/// Message-only response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
