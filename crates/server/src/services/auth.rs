//! Admin authentication: argon2 password hashing and login.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::http::StatusCode;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use advice_for_life_core::Email;

use crate::db::{AdminUserRepository, RepositoryError};
use crate::models::AdminUser;

/// Errors that can occur during admin authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair did not match an admin.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing or hash parsing failed.
    #[error("password hash error: {0}")]
    Hash(String),

    /// Repository error during lookup.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Hash(_) | Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message for this error.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid credentials",
            Self::Hash(_) | Self::Repository(_) => "Internal server error",
        }
    }
}

/// Hash a password with argon2 and a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::Hash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch and `AuthError::Hash`
/// if the stored hash cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Login/creation flows over the admin user repository.
pub struct AdminAuthService<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Authenticate an admin by email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for unknown emails and wrong
    /// passwords alike; the caller cannot distinguish the two.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<AdminUser, AuthError> {
        let repo = AdminUserRepository::new(self.pool);

        let Some((user, password_hash)) = repo.get_with_password(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;
        Ok(user)
    }

    /// Create an admin with a plaintext password (hashed here).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` wrapping a `Conflict` if the email is
    /// taken.
    pub async fn create_admin(
        &self,
        email: &Email,
        name: &str,
        role: advice_for_life_core::AdminRole,
        password: &str,
    ) -> Result<AdminUser, AuthError> {
        let password_hash = hash_password(password)?;
        let repo = AdminUserRepository::new(self.pool);
        Ok(repo.create(email, name, role, &password_hash).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse battery staple", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("correct horse battery staple").unwrap();
        let err = verify_password("incorrect horse", &hash).unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_garbage_hash_rejected() {
        let err = verify_password("anything", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::Hash(_)));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }
}
