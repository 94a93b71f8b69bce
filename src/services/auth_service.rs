//! Authentication service - Handles login, token issuing and verification.
//!
//! Passwords are checked through the domain `Password` value object; tokens
//! are HS256 JWTs carried in the `authToken` cookie.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{Config, SECONDS_PER_MINUTE};
use crate::domain::{Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Freshly issued session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a token
    async fn login(&self, username: String, password: String) -> AppResult<Session>;

    /// Issue a new token for a still existing account
    async fn refresh(&self, user_id: i32) -> AppResult<Session>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Create the first admin account when there are no users yet.
    /// Returns whether an account was created.
    async fn ensure_bootstrap_admin(&self, username: &str, password: &str) -> AppResult<bool>;
}

/// Generate JWT token for a user
fn generate_token(user: &User, config: &Config) -> AppResult<Session> {
    let now = Utc::now();
    let expires_at = now + Duration::minutes(config.jwt_expiration_minutes);

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(Session {
        token,
        user: user.clone(),
        expires_in: config.jwt_expiration_minutes * SECONDS_PER_MINUTE,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, username: String, password: String) -> AppResult<Session> {
        tracing::info!(username = %username, "Login attempt");
        let user = self.uow.users().find_by_username(&username).await?;

        // Verify against a dummy hash for unknown users so timing does not
        // reveal which usernames exist.
        let dummy_hash = "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::from_hash(dummy_hash.to_string()),
        };
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => {
                tracing::info!(user_id = user.id, "Login successful");
                generate_token(&user, &self.config)
            }
            _ => {
                tracing::info!(username = %username, "Login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn refresh(&self, user_id: i32) -> AppResult<Session> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        generate_token(&user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn ensure_bootstrap_admin(&self, username: &str, password: &str) -> AppResult<bool> {
        let users = self.uow.users();
        if users.count().await? > 0 {
            return Ok(false);
        }

        crate::domain::validate_username(username)?;
        let hash = Password::new(password)?.into_string();
        users
            .create(username.to_string(), hash, UserRole::Admin)
            .await?;

        tracing::info!(username = %username, "Bootstrap admin account created");
        Ok(true)
    }
}
