//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Redis-backed rate limiting
//! - Photo storage on the local filesystem
//! - In-process event fan-out
//! - Unit of Work for transaction management

pub mod broadcaster;
pub mod cache;
pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use broadcaster::{DirectoryEvent, EventBroadcaster};
pub use cache::{Cache, RateLimiter};
pub use db::{Database, Migrator};
pub use repositories::{UserChanges, UserRepository, UserStore};
pub use storage::PhotoStorage;
pub use unit_of_work::{
    Persistence, ReadContext, Repositories, TransactionContext, TxFuture, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockRateLimiter;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
