//! User repository implementation.
//!
//! Query bodies are written once against [`ConnectionTrait`] so the pooled
//! store and the transaction-scoped repository share them.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Select, Set, Unchanged,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::USER_NOT_FOUND_MESSAGE;
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Listing and search results are ordered newest first.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List every user, newest first
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Case-insensitive substring match on name or email
    async fn search(&self, query: &str) -> AppResult<Vec<User>>;

    /// Insert a new user
    async fn create(&self, user: NewUser) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn list(&self) -> AppResult<Vec<User>> {
        list(&self.db).await
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn search(&self, query: &str) -> AppResult<Vec<User>> {
        search(&self.db, query).await
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        create(&self.db, user).await
    }
}

fn newest_first(select: Select<UserEntity>) -> Select<UserEntity> {
    select
        .order_by_desc(user::Column::CreatedAt)
        .order_by_desc(user::Column::Id)
}

fn into_users(models: Vec<user::Model>) -> AppResult<Vec<User>> {
    models.into_iter().map(User::try_from).collect()
}

/// Build a `LIKE` pattern matching `query` literally anywhere in a value.
///
/// Lowercased so it pairs with `LOWER(column)`; `\`, `%` and `_` are escaped.
///
/// The pattern is folded with full Unicode rules. Postgres `lower()` does the
/// same for stored values, but SQLite's `LOWER` only folds ASCII, so there a
/// non-ASCII uppercase letter in a stored name or email will not match.
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub(crate) async fn list<C: ConnectionTrait>(db: &C) -> AppResult<Vec<User>> {
    let models = newest_first(UserEntity::find()).all(db).await?;
    into_users(models)
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<User>> {
    UserEntity::find_by_id(id)
        .one(db)
        .await?
        .map(User::try_from)
        .transpose()
}

pub(crate) async fn search<C: ConnectionTrait>(db: &C, query: &str) -> AppResult<Vec<User>> {
    let pattern = contains_pattern(query);
    let matches = |column: user::Column| {
        Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern.clone()).escape('\\'))
    };

    let models = newest_first(UserEntity::find())
        .filter(
            Condition::any()
                .add(matches(user::Column::Name))
                .add(matches(user::Column::Email)),
        )
        .all(db)
        .await?;

    into_users(models)
}

pub(crate) async fn create<C: ConnectionTrait>(db: &C, user: NewUser) -> AppResult<User> {
    let active_model = ActiveModel {
        id: NotSet,
        name: Set(user.name),
        email: Set(user.email),
        role: Set(user.role.to_string()),
        created_at: Set(user.created_at),
    };

    let model = active_model.insert(db).await?;
    User::try_from(model)
}

/// Persist the mutable fields (name, role) of an existing user.
pub(crate) async fn save<C: ConnectionTrait>(db: &C, user: &User) -> AppResult<User> {
    let active_model = ActiveModel {
        id: Unchanged(user.id),
        name: Set(user.name.clone()),
        email: NotSet,
        role: Set(user.role.to_string()),
        created_at: NotSet,
    };

    let model = active_model.update(db).await.map_err(|e| match e {
        sea_orm::DbErr::RecordNotUpdated => AppError::not_found(USER_NOT_FOUND_MESSAGE),
        other => AppError::from(other),
    })?;
    User::try_from(model)
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<()> {
    let result = UserEntity::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found(USER_NOT_FOUND_MESSAGE));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_wraps_and_lowercases() {
        assert_eq!(contains_pattern("Ann"), "%ann%");
    }

    #[test]
    fn test_contains_pattern_folds_non_ascii() {
        assert_eq!(contains_pattern("ÉLISE"), "%élise%");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
