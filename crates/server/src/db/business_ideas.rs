//! Business idea submission repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use advice_for_life_core::{BusinessIdeaId, Email, IdeaStatus};

use super::RepositoryError;
use crate::models::{BusinessIdea, IdeaReview, NewBusinessIdea};

const IDEA_COLUMNS: &str = "id, submitter_name, submitter_email, business_name, description, \
     why_it_matters, status, equity_percentage, admin_notes, reviewed_at, reviewed_by, \
     created_at, updated_at";

/// Raw database row for a business idea.
#[derive(sqlx::FromRow)]
struct IdeaRow {
    id: BusinessIdeaId,
    submitter_name: String,
    submitter_email: String,
    business_name: String,
    description: String,
    why_it_matters: String,
    status: String,
    equity_percentage: Option<Decimal>,
    admin_notes: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    reviewed_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IdeaRow> for BusinessIdea {
    type Error = RepositoryError;

    fn try_from(row: IdeaRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("idea {}: {e}", row.id)))?;
        let submitter_email = Email::parse(&row.submitter_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("idea {}: invalid email: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            submitter_name: row.submitter_name,
            submitter_email,
            business_name: row.business_name,
            description: row.description,
            why_it_matters: row.why_it_matters,
            status,
            equity_percentage: row.equity_percentage,
            admin_notes: row.admin_notes,
            reviewed_at: row.reviewed_at,
            reviewed_by: row.reviewed_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Count of ideas in one review status.
#[derive(Debug, Clone, Copy)]
pub struct StatusCount {
    pub status: IdeaStatus,
    pub count: i64,
}

/// Repository for business idea submissions.
pub struct BusinessIdeaRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BusinessIdeaRepository<'a> {
    /// Create a new business idea repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Save a new submission (status starts at `pending`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, idea: &NewBusinessIdea) -> Result<BusinessIdea, RepositoryError> {
        let query = format!(
            "INSERT INTO business_ideas (submitter_name, submitter_email, business_name, \
             description, why_it_matters) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {IDEA_COLUMNS}"
        );
        let row = sqlx::query_as::<_, IdeaRow>(&query)
            .bind(&idea.submitter_name)
            .bind(&idea.submitter_email)
            .bind(&idea.business_name)
            .bind(&idea.description)
            .bind(&idea.why_it_matters)
            .fetch_one(self.pool)
            .await?;

        row.try_into()
    }

    /// List submissions, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<IdeaStatus>,
    ) -> Result<Vec<BusinessIdea>, RepositoryError> {
        let rows = match status {
            Some(status) => {
                let query = format!(
                    "SELECT {IDEA_COLUMNS} FROM business_ideas WHERE status = $1 \
                     ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, IdeaRow>(&query)
                    .bind(status.as_str())
                    .fetch_all(self.pool)
                    .await?
            }
            None => {
                let query =
                    format!("SELECT {IDEA_COLUMNS} FROM business_ideas ORDER BY created_at DESC");
                sqlx::query_as::<_, IdeaRow>(&query).fetch_all(self.pool).await?
            }
        };

        rows.into_iter().map(BusinessIdea::try_from).collect()
    }

    /// Count submissions per review status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, and
    /// `DataCorruption` if a stored status is unknown.
    pub async fn status_counts(&self) -> Result<Vec<StatusCount>, RepositoryError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM business_ideas GROUP BY status")
                .fetch_all(self.pool)
                .await?;

        rows.into_iter()
            .map(|(status, count)| {
                let status = status
                    .parse()
                    .map_err(|e| RepositoryError::DataCorruption(format!("idea counts: {e}")))?;
                Ok(StatusCount { status, count })
            })
            .collect()
    }

    /// Total number of submissions (shown publicly on the landing page).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM business_ideas")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Apply an admin review to a submission.
    ///
    /// A status change stamps `reviewed_at` and `reviewed_by`; equity and
    /// notes change independently.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the submission does not exist.
    pub async fn review(
        &self,
        id: BusinessIdeaId,
        review: &IdeaReview,
        reviewed_by: &str,
    ) -> Result<BusinessIdea, RepositoryError> {
        let mut current = self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)?;

        if let Some(status) = review.status {
            current.status = status;
            current.reviewed_at = Some(Utc::now());
            current.reviewed_by = Some(reviewed_by.to_owned());
        }
        if let Some(equity) = review.equity_percentage {
            current.equity_percentage = Some(equity);
        }
        if let Some(notes) = &review.admin_notes {
            current.admin_notes = Some(notes.clone());
        }

        let query = format!(
            "UPDATE business_ideas \
             SET status = $2, equity_percentage = $3, admin_notes = $4, reviewed_at = $5, \
                 reviewed_by = $6, updated_at = now() \
             WHERE id = $1 \
             RETURNING {IDEA_COLUMNS}"
        );
        let row = sqlx::query_as::<_, IdeaRow>(&query)
            .bind(id)
            .bind(current.status.as_str())
            .bind(current.equity_percentage)
            .bind(&current.admin_notes)
            .bind(current.reviewed_at)
            .bind(&current.reviewed_by)
            .fetch_one(self.pool)
            .await?;

        row.try_into()
    }

    /// Get a submission by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: BusinessIdeaId,
    ) -> Result<Option<BusinessIdea>, RepositoryError> {
        let query = format!("SELECT {IDEA_COLUMNS} FROM business_ideas WHERE id = $1");
        let row = sqlx::query_as::<_, IdeaRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(BusinessIdea::try_from).transpose()
    }

    /// Delete a submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the submission does not exist.
    pub async fn delete(&self, id: BusinessIdeaId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM business_ideas WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
