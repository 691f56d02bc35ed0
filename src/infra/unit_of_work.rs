//! Unit of Work pattern implementation.
//!
//! The Unit of Work:
//! - Centralizes access to the user repository
//! - Manages database transactions (begin, commit, rollback)
//! - Guarantees a failed mutation leaves the store unchanged

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction,
    IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::user_repository as queries;
use super::repositories::{UserRepository, UserStore};
use crate::domain::User;
use crate::errors::{AppError, AppResult};

/// Boxed future returned by a transactional closure.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock the repository or use an in-memory database.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed when the closure returns `Ok` and rolled
    /// back when it returns `Err`. Uses ReadCommitted isolation where the
    /// backend supports choosing one.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        Self { db, user_repo }
    }

    async fn begin(&self, isolation: IsolationLevel) -> AppResult<DatabaseTransaction> {
        let txn = match self.db.get_database_backend() {
            // SQLite transactions are always serializable
            DatabaseBackend::Sqlite => self.db.begin().await?,
            _ => {
                self.db
                    .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
                    .await?
            }
        };
        Ok(txn)
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self.begin(IsolationLevel::ReadCommitted).await?;

        let outcome = f(TransactionContext::new(&txn)).await;

        match outcome {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware user repository.
///
/// Executes all operations within the borrowed transaction.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        queries::find_by_id(self.txn, id).await
    }

    /// Persist a user's name and role
    pub async fn save(&self, user: &User) -> AppResult<User> {
        queries::save(self.txn, user).await
    }

    /// Remove a user row
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        queries::delete(self.txn, id).await
    }
}

/// Run a block inside a transaction of the given Unit of Work.
///
/// ```rust,ignore
/// let user = with_transaction!(self.uow, |ctx| {
///     let user = ctx.users().find_by_id(id).await?;
///     Ok(user)
/// })?;
/// ```
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
