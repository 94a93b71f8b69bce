//! User accounts for the admin panel.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{
    MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH, ROLE_ADMIN, ROLE_STAFF_MANAGER, ROLE_USER,
};
use crate::errors::{AppError, AppResult};

static USERNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^[A-Za-z0-9]{{{},{}}}$",
        MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
    ))
    .expect("valid regex")
});

/// Usernames are 3 to 30 ASCII letters or digits.
pub fn validate_username(username: &str) -> AppResult<()> {
    if USERNAME.is_match(username) {
        Ok(())
    } else {
        Err(AppError::validation(
            "El nombre de usuario debe ser alfanumérico y tener entre 3 y 30 caracteres.",
        ))
    }
}

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    StaffManager,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Whether this role may change directory data (personnel, departments,
    /// positions, extensions, announcements)
    pub fn can_manage_directory(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::StaffManager)
    }

    /// Parse a stored role string, rejecting unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ROLE_ADMIN => Some(UserRole::Admin),
            ROLE_STAFF_MANAGER => Some(UserRole::StaffManager),
            ROLE_USER => Some(UserRole::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::StaffManager => ROLE_STAFF_MANAGER,
            UserRole::User => ROLE_USER,
        }
    }
}

/// Unknown role strings degrade to the least privileged role.
impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        UserRole::parse(s).unwrap_or(UserRole::User)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "recepcion")]
    pub username: String,
    #[schema(example = "staff_manager")]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role.to_string(),
            created_at: user.created_at,
        }
    }
}
