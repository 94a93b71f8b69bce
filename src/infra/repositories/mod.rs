//! Repository layer - Data access abstraction
//!
//! User accounts sit behind a mockable trait object. Directory repositories
//! borrow a connection and work the same on a pool or inside a transaction,
//! which is how multi-table writes share one transaction.

mod announcement_repository;
mod department_repository;
pub(crate) mod entities;
mod extension_repository;
mod personnel_repository;
mod position_repository;
mod setting_repository;
mod user_repository;

pub use announcement_repository::AnnouncementRepository;
pub use department_repository::DepartmentRepository;
pub use extension_repository::ExtensionRepository;
pub use personnel_repository::PersonnelRepository;
pub use position_repository::PositionRepository;
pub use setting_repository::SettingRepository;
pub use user_repository::{UserChanges, UserRepository, UserStore};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
