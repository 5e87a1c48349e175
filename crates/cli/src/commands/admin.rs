//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! afl-cli admin create -e brandon@adviceforlife.com -n "Brandon Rohm" -p <password>
//! ```
//!
//! # Environment Variables
//!
//! - `AFL_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use secrecy::SecretString;
use thiserror::Error;

use advice_for_life_core::{AdminRole, Email};
use advice_for_life_server::db;
use advice_for_life_server::db::RepositoryError;
use advice_for_life_server::services::AdminAuthService;
use advice_for_life_server::services::auth::AuthError;

/// Minimum accepted password length for admin accounts.
const MIN_PASSWORD_LENGTH: usize = 12;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: admin, super_admin")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// User already exists.
    #[error("Admin user already exists with email: {0}")]
    UserExists(String),

    /// Password hashing or repository failure.
    #[error("Auth error: {0}")]
    Auth(String),
}

/// Create a new admin user.
///
/// # Arguments
///
/// * `email` - Admin's email address
/// * `name` - Admin's display name
/// * `role` - Admin's role (`admin` or `super_admin`)
/// * `password` - Login password (argon2-hashed before storage)
///
/// # Errors
///
/// Returns an error for invalid input, duplicate emails, or database
/// failures.
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<(), AdminError> {
    dotenvy::dotenv().ok();

    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;
    let email =
        Email::parse_normalized(email).map_err(|_| AdminError::InvalidEmail(email.to_owned()))?;
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::WeakPassword);
    }

    let database_url = std::env::var("AFL_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| AdminError::MissingEnvVar("AFL_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Creating admin user: {} ({})", email, role);

    let user = AdminAuthService::new(&pool)
        .create_admin(&email, name, role, password)
        .await
        .map_err(|e| match e {
            AuthError::Repository(RepositoryError::Conflict(_)) => {
                AdminError::UserExists(email.to_string())
            }
            other => AdminError::Auth(other.to_string()),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );

    Ok(())
}
