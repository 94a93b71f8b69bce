//! User service - Administration of login accounts.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{validate_username, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{UnitOfWork, UserChanges};

/// Data for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

/// Partial account update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// List all accounts
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Get account by ID
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// Create an account with a policy-checked password
    async fn create_user(&self, new_user: NewUser) -> AppResult<User>;

    /// Update username, password or role
    async fn update_user(&self, id: i32, update: UserUpdate) -> AppResult<User>;

    /// Delete an account. `acting_user_id` may not delete itself.
    async fn delete_user(&self, acting_user_id: i32, id: i32) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_username_free(&self, username: &str, except: Option<i32>) -> AppResult<()> {
        match self.uow.users().find_by_username(username).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(AppError::conflict("El nombre de usuario ya existe."))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let username = new_user.username.trim().to_string();
        validate_username(&username)?;
        self.ensure_username_free(&username, None).await?;

        let password_hash = Password::new(&new_user.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(username, password_hash, new_user.role)
            .await?;

        tracing::info!(user_id = user.id, role = %user.role, "User created");
        Ok(user)
    }

    async fn update_user(&self, id: i32, update: UserUpdate) -> AppResult<User> {
        let mut changes = UserChanges {
            role: update.role,
            ..Default::default()
        };

        if let Some(username) = update.username {
            let username = username.trim().to_string();
            validate_username(&username)?;
            self.ensure_username_free(&username, Some(id)).await?;
            changes.username = Some(username);
        }
        if let Some(password) = update.password.filter(|p| !p.is_empty()) {
            changes.password_hash = Some(Password::new(&password)?.into_string());
        }

        let user = self.uow.users().update(id, changes).await?;
        tracing::info!(user_id = user.id, "User updated");
        Ok(user)
    }

    async fn delete_user(&self, acting_user_id: i32, id: i32) -> AppResult<()> {
        if acting_user_id == id {
            return Err(AppError::bad_request(
                "No puedes eliminar tu propia cuenta de administrador.",
            ));
        }

        self.uow.users().delete(id).await?;
        tracing::info!(user_id = id, deleted_by = acting_user_id, "User deleted");
        Ok(())
    }
}
