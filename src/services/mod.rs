//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod announcement_service;
mod auth_service;
pub mod container;
mod department_service;
pub mod directory;
mod extension_service;
pub mod import;
mod personnel_service;
mod position_service;
mod theme_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use announcement_service::{AnnouncementInput, AnnouncementManager, AnnouncementService};
pub use auth_service::{AuthService, Authenticator, Claims, Session};
pub use department_service::{DepartmentManager, DepartmentService};
pub use extension_service::{ExtensionInput, ExtensionManager, ExtensionService};
pub use import::{ImportReport, ImportService, Importer};
pub use personnel_service::{PersonnelForm, PersonnelManager, PersonnelService, PhotoUpload};
pub use position_service::{PositionInput, PositionManager, PositionService};
pub use theme_service::{ThemeManager, ThemeService};
pub use user_service::{NewUser, UserManager, UserService, UserUpdate};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
