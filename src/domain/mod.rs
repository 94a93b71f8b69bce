//! Domain layer - Core business entities and rules
//!
//! Directory entities, the extension ownership rules and the value objects
//! used by services. Nothing here touches the database.

pub mod announcement;
pub mod department;
pub mod extension;
pub mod password;
pub mod personnel;
pub mod position;
pub mod search;
pub mod theme;
pub mod user;

pub use announcement::Announcement;
pub use department::Department;
pub use extension::{
    effective_extension, ensure_assignable_to_personnel, ensure_assignable_to_position,
    Extension, ExtensionLinks, ExtensionStatus, Occupancy, OccupantType,
};
pub use password::Password;
pub use personnel::{
    BirthdayEntry, DirectoryEntry, NewPersonnel, Personnel, PersonnelChanges,
};
pub use position::{Position, PositionView};
pub use theme::Theme;
pub use user::{validate_username, User, UserResponse, UserRole};
