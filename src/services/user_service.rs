//! User service - Directory operations and their visibility rules.
//!
//! Admins see and manage the whole directory; everyone else only sees
//! their own record. Role gates for admin-only operations are enforced by
//! the HTTP layer before these methods run.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use super::CurrentUser;
use crate::config::{SELF_DELETE_MESSAGE, USER_NOT_FOUND_MESSAGE, VIEW_USER_FORBIDDEN_MESSAGE};
use crate::domain::{normalize_name, NewUser, UpdateUser, User, UserChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Admins get every user (newest first); others get only themselves
    async fn list_users(&self, caller: &CurrentUser) -> AppResult<Vec<User>>;

    /// Get a user the caller is allowed to see (self, or anyone for admins)
    async fn get_user(&self, caller: &CurrentUser, id: i32) -> AppResult<User>;

    /// Update name and/or role; nothing is written unless every field is valid
    async fn update_user(&self, id: i32, input: UpdateUser) -> AppResult<User>;

    /// Delete a user other than the caller, returning the removed record
    async fn delete_user(&self, caller: &CurrentUser, id: i32) -> AppResult<User>;

    /// Search by name or email; a blank query matches nothing
    async fn search_users(&self, query: &str) -> AppResult<Vec<User>>;

    /// Insert a user record (operator bootstrap); name and email are validated
    async fn create_user(&self, user: NewUser) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list_users(&self, caller: &CurrentUser) -> AppResult<Vec<User>> {
        if caller.is_admin() {
            self.uow.users().list().await
        } else {
            Ok(vec![caller.user().clone()])
        }
    }

    async fn get_user(&self, caller: &CurrentUser, id: i32) -> AppResult<User> {
        if caller.id() != id && !caller.is_admin() {
            return Err(AppError::forbidden(VIEW_USER_FORBIDDEN_MESSAGE));
        }

        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found(USER_NOT_FOUND_MESSAGE)
    }

    async fn update_user(&self, id: i32, input: UpdateUser) -> AppResult<User> {
        with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            let mut user = users
                .find_by_id(id)
                .await?
                .ok_or_not_found(USER_NOT_FOUND_MESSAGE)?;

            let changes = UserChanges::parse(input)?;
            if changes.is_empty() {
                return Ok(user);
            }

            user.apply(changes);
            users.save(&user).await
        })
    }

    async fn delete_user(&self, caller: &CurrentUser, id: i32) -> AppResult<User> {
        if caller.id() == id {
            return Err(AppError::bad_request(SELF_DELETE_MESSAGE));
        }

        with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            let user = users
                .find_by_id(id)
                .await?
                .ok_or_not_found(USER_NOT_FOUND_MESSAGE)?;

            users.delete(user.id).await?;
            Ok::<_, AppError>(user)
        })
    }

    async fn search_users(&self, query: &str) -> AppResult<Vec<User>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        self.uow.users().search(query).await
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        user.validate()?;
        let name = normalize_name(&user.name)?
            .ok_or_else(|| AppError::validation("Name is required"))?;

        self.uow.users().create(NewUser { name, ..user }).await
    }
}
