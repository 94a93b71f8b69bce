//! API middleware.

mod auth;
mod rate_limit;

pub use auth::{
    auth_middleware, clear_auth_cookie, create_auth_cookie, require_admin,
    require_directory_manager, CurrentUser,
};
pub use rate_limit::{rate_limit_login_middleware, rate_limit_middleware};
