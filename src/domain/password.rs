//! Password value object.
//!
//! Owns the strength policy and the Argon2 configuration so nothing else
//! touches raw hashes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Hashed password. Compared by value, never printed.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Validate `plain_text` against the strength policy and hash it.
    ///
    /// # Errors
    /// Returns a validation error when the password is shorter than the
    /// minimum or lacks a lowercase letter, an uppercase letter, a digit
    /// or a symbol.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        Self::check_strength(plain_text)?;
        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn check_strength(plain_text: &str) -> AppResult<()> {
        let long_enough = plain_text.chars().count() >= MIN_PASSWORD_LENGTH as usize;
        let has_lower = plain_text.chars().any(|c| c.is_lowercase());
        let has_upper = plain_text.chars().any(|c| c.is_uppercase());
        let has_digit = plain_text.chars().any(|c| c.is_ascii_digit());
        let has_symbol = plain_text
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

        if long_enough && has_lower && has_upper && has_digit && has_symbol {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "La contraseña debe tener al menos {} caracteres, una mayúscula, una minúscula, un número y un símbolo.",
                MIN_PASSWORD_LENGTH
            )))
        }
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "Secure#Pass123";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("Wrong#Pass123"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "Restore$Me42";
        let hash = Password::new(plain).unwrap().into_string();

        assert!(Password::from_hash(hash).verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "Same!Pass99";
        let a = Password::new(plain).unwrap();
        let b = Password::new(plain).unwrap();

        assert_ne!(a.as_str(), b.as_str());
        assert!(a.verify(plain) && b.verify(plain));
    }

    #[test]
    fn test_weak_passwords_rejected() {
        for weak in ["Sh0rt!", "alllower1!", "ALLUPPER1!", "NoDigits!!", "NoSymbol123"] {
            assert!(
                matches!(Password::new(weak), Err(AppError::Validation(_))),
                "{weak} should be rejected"
            );
        }
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!Password::from_hash("not-a-hash".into()).verify("anything"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::new("Visible?No1").unwrap();
        assert!(format!("{:?}", password).contains("[REDACTED]"));
    }
}
