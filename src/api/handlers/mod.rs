//! HTTP request handlers.

pub mod announcement_handler;
pub mod auth_handler;
pub mod department_handler;
pub mod event_handler;
pub mod extension_handler;
pub mod personnel_handler;
pub mod position_handler;
pub mod public_handler;
pub mod theme_handler;
pub mod user_handler;

pub use announcement_handler::announcement_routes;
pub use auth_handler::{auth_routes, session_routes};
pub use department_handler::department_routes;
pub use extension_handler::extension_routes;
pub use personnel_handler::personnel_routes;
pub use position_handler::position_routes;
pub use public_handler::public_routes;
pub use user_handler::user_routes;
