//! Unit of Work pattern implementation.
//!
//! Manages transaction lifecycle and repository access. Directory
//! repositories are handed out scoped to either the shared pool
//! ([`ReadContext`]) or an open transaction ([`TransactionContext`]), so a
//! multi-table write performs every check and insert on the same connection.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, IsolationLevel,
    TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::{
    AnnouncementRepository, DepartmentRepository, ExtensionRepository, PersonnelRepository,
    PositionRepository, SettingRepository, UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transaction closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock at the repository level or use integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Repositories bound to the connection pool, for reads and single
    /// statement writes.
    fn reader(&self) -> ReadContext<'_>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success and rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one connection or transaction.
pub struct Repositories<'a, C> {
    conn: &'a C,
}

/// Repositories over the connection pool.
pub type ReadContext<'a> = Repositories<'a, DatabaseConnection>;

/// Repositories inside an open transaction.
pub type TransactionContext<'a> = Repositories<'a, DatabaseTransaction>;

impl<'a, C: ConnectionTrait> Repositories<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub fn departments(&self) -> DepartmentRepository<'a, C> {
        DepartmentRepository::new(self.conn)
    }

    pub fn positions(&self) -> PositionRepository<'a, C> {
        PositionRepository::new(self.conn)
    }

    pub fn extensions(&self) -> ExtensionRepository<'a, C> {
        ExtensionRepository::new(self.conn)
    }

    pub fn personnel(&self) -> PersonnelRepository<'a, C> {
        PersonnelRepository::new(self.conn)
    }

    pub fn announcements(&self) -> AnnouncementRepository<'a, C> {
        AnnouncementRepository::new(self.conn)
    }

    pub fn settings(&self) -> SettingRepository<'a, C> {
        SettingRepository::new(self.conn)
    }
}

impl<'a> TransactionContext<'a> {
    /// Run `f` inside a nested transaction (a savepoint).
    ///
    /// On error only the work done by `f` is undone; the enclosing
    /// transaction stays usable.
    pub async fn savepoint<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'s> FnOnce(TransactionContext<'s>) -> TxFuture<'s, T> + Send,
        T: Send,
    {
        let nested = self.conn.begin().await.map_err(AppError::from)?;

        match f(Repositories::new(&nested)).await {
            Ok(result) => {
                nested.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = nested.rollback().await {
                    tracing::error!("Savepoint rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
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

    /// Internal transaction execution with configurable isolation level
    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        match f(Repositories::new(&txn)).await {
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

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn reader(&self) -> ReadContext<'_> {
        Repositories::new(&self.db)
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // Use ReadCommitted for balanced consistency/performance
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }
}
