//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod announcement;
pub mod department;
pub mod extension;
pub mod personnel;
pub mod personnel_extension;
pub mod position;
pub mod position_extension;
pub mod setting;
pub mod user;
