//! Email subscriber repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use advice_for_life_core::{Email, SubscriberId};

use super::RepositoryError;
use crate::models::EmailSubscriber;

const SUBSCRIBER_COLUMNS: &str = "id, email, source, subscribed, created_at, updated_at";

/// Raw database row for a subscriber.
#[derive(sqlx::FromRow)]
struct SubscriberRow {
    id: SubscriberId,
    email: String,
    source: String,
    subscribed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriberRow> for EmailSubscriber {
    type Error = RepositoryError;

    fn try_from(row: SubscriberRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("subscriber {}: invalid email: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            email,
            source: row.source,
            subscribed: row.subscribed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for newsletter subscriber operations.
pub struct SubscriberRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubscriberRepository<'a> {
    /// Create a new subscriber repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a subscriber by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<EmailSubscriber>, RepositoryError> {
        let query = format!("SELECT {SUBSCRIBER_COLUMNS} FROM email_subscribers WHERE email = $1");
        let row = sqlx::query_as::<_, SubscriberRow>(&query)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        row.map(EmailSubscriber::try_from).transpose()
    }

    /// Create a new subscriber.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already on the
    /// list.
    pub async fn create(
        &self,
        email: &Email,
        source: &str,
    ) -> Result<EmailSubscriber, RepositoryError> {
        let query = format!(
            "INSERT INTO email_subscribers (email, source) VALUES ($1, $2) \
             RETURNING {SUBSCRIBER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SubscriberRow>(&query)
            .bind(email)
            .bind(source)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("email already subscribed".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        row.try_into()
    }

    /// Flip a previously unsubscribed address back to subscribed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the email is not on the list.
    pub async fn resubscribe(&self, email: &Email) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE email_subscribers SET subscribed = TRUE, updated_at = now() WHERE email = $1",
        )
        .bind(email)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Record a purchaser's email with source `purchase`.
    ///
    /// Existing rows are left untouched (in particular, an unsubscribed
    /// customer stays unsubscribed).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_purchase(&self, email: &Email) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO email_subscribers (email, source) VALUES ($1, 'purchase') \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(email)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
