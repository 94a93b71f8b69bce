//! Service Container - Centralized service access with parallel execution support.
//!
//! Handlers reach every use case through [`ServiceContainer`], which hands
//! out trait objects so tests can substitute any of them.

use std::future::Future;
use std::sync::Arc;

use super::{
    AnnouncementManager, AnnouncementService, AuthService, Authenticator, DepartmentManager,
    DepartmentService, ExtensionManager, ExtensionService, ImportService, Importer,
    PersonnelManager, PersonnelService, PositionManager, PositionService, ThemeManager,
    ThemeService, UserManager, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{EventBroadcaster, Persistence, PhotoStorage};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    fn departments(&self) -> Arc<dyn DepartmentService>;

    fn positions(&self) -> Arc<dyn PositionService>;

    fn extensions(&self) -> Arc<dyn ExtensionService>;

    fn personnel(&self) -> Arc<dyn PersonnelService>;

    fn announcements(&self) -> Arc<dyn AnnouncementService>;

    fn theme(&self) -> Arc<dyn ThemeService>;

    /// CSV bulk imports
    fn imports(&self) -> Arc<dyn ImportService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    department_service: Arc<dyn DepartmentService>,
    position_service: Arc<dyn PositionService>,
    extension_service: Arc<dyn ExtensionService>,
    personnel_service: Arc<dyn PersonnelService>,
    announcement_service: Arc<dyn AnnouncementService>,
    theme_service: Arc<dyn ThemeService>,
    import_service: Arc<dyn ImportService>,
}

impl Services {
    /// Create service container from database connection and config.
    ///
    /// Every mutating service publishes through the same `events` channel.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        events: EventBroadcaster,
        storage: PhotoStorage,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            department_service: Arc::new(DepartmentManager::new(uow.clone(), events.clone())),
            position_service: Arc::new(PositionManager::new(uow.clone(), events.clone())),
            extension_service: Arc::new(ExtensionManager::new(uow.clone(), events.clone())),
            personnel_service: Arc::new(PersonnelManager::new(
                uow.clone(),
                events.clone(),
                storage,
            )),
            announcement_service: Arc::new(AnnouncementManager::new(uow.clone(), events.clone())),
            theme_service: Arc::new(ThemeManager::new(uow.clone(), events.clone())),
            import_service: Arc::new(Importer::new(uow, events)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn departments(&self) -> Arc<dyn DepartmentService> {
        self.department_service.clone()
    }

    fn positions(&self) -> Arc<dyn PositionService> {
        self.position_service.clone()
    }

    fn extensions(&self) -> Arc<dyn ExtensionService> {
        self.extension_service.clone()
    }

    fn personnel(&self) -> Arc<dyn PersonnelService> {
        self.personnel_service.clone()
    }

    fn announcements(&self) -> Arc<dyn AnnouncementService> {
        self.announcement_service.clone()
    }

    fn theme(&self) -> Arc<dyn ThemeService> {
        self.theme_service.clone()
    }

    fn imports(&self) -> Arc<dyn ImportService> {
        self.import_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute three independent async operations in parallel.
    ///
    /// If any operation fails, the error is returned immediately.
    pub async fn join3<F1, F2, F3, T1, T2, T3>(
        f1: F1,
        f2: F2,
        f3: F3,
    ) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn test_join3_collects_results() {
        let (a, b, c) = parallel::join3(async { Ok(1) }, async { Ok("two") }, async { Ok(3.0) })
            .await
            .unwrap();
        assert_eq!((a, b, c), (1, "two", 3.0));
    }

    #[tokio::test]
    async fn test_join3_fails_fast() {
        let result = parallel::join3(
            async { Ok::<_, AppError>(1) },
            async { Err::<i32, _>(AppError::NotFound) },
            async { Ok::<_, AppError>(3) },
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
