//! Contact submission repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use advice_for_life_core::{ContactSubmissionId, Email};

use super::RepositoryError;
use crate::models::ContactSubmission;

/// Raw database row for a contact submission.
#[derive(sqlx::FromRow)]
struct ContactRow {
    id: ContactSubmissionId,
    name: String,
    email: String,
    subject: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for ContactSubmission {
    type Error = RepositoryError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("contact {}: invalid email: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            subject: row.subject,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

/// Repository for contact form submissions.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Save a contact submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        subject: &str,
        message: &str,
    ) -> Result<ContactSubmission, RepositoryError> {
        let row = sqlx::query_as::<_, ContactRow>(
            "INSERT INTO contact_submissions (name, email, subject, message) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, subject, message, created_at",
        )
        .bind(name)
        .bind(email)
        .bind(subject)
        .bind(message)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }
}
