//! Database operations.
//!
//! # Database: `advice_for_life`
//!
//! ## Tables
//!
//! - `orders` - Paid Stripe checkout sessions
//! - `download_links` - Tokenized digital delivery
//! - `email_subscribers` - Newsletter list
//! - `contact_submissions` - Contact form messages
//! - `businesses` - Public business tracker
//! - `business_ideas` - Visitor submissions + review workflow
//! - `admin_users` - Admin credentials
//! - `session` - tower-sessions storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p advice-for-life-cli -- migrate
//! ```
//!
//! Queries use the runtime sqlx API with `FromRow` row structs; rows are
//! converted to domain models at this boundary, and invalid stored values
//! surface as [`RepositoryError::DataCorruption`].

pub mod admin_users;
pub mod business_ideas;
pub mod businesses;
pub mod contact;
pub mod download_links;
pub mod orders;
pub mod subscribers;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::AdminUserRepository;
pub use business_ideas::BusinessIdeaRepository;
pub use businesses::BusinessRepository;
pub use contact::ContactRepository;
pub use download_links::DownloadLinkRepository;
pub use orders::OrderRepository;
pub use subscribers::SubscriberRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
