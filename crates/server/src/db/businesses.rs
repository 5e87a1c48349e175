//! Business tracker repository.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use advice_for_life_core::{AdminUserId, BusinessId};

use super::RepositoryError;
use crate::models::{Business, BusinessUpdate, NewBusiness};

const BUSINESS_COLUMNS: &str = "id, name, description, launch_date, website_link, status, \
     category, milestone, image_url, position, created_by, created_at, updated_at";

/// Raw database row for a business.
#[derive(sqlx::FromRow)]
struct BusinessRow {
    id: BusinessId,
    name: String,
    description: String,
    launch_date: NaiveDate,
    website_link: Option<String>,
    status: String,
    category: Option<String>,
    milestone: Option<String>,
    image_url: Option<String>,
    position: i32,
    created_by: Option<AdminUserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BusinessRow> for Business {
    type Error = RepositoryError;

    fn try_from(row: BusinessRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("business {}: {e}", row.id)))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            launch_date: row.launch_date,
            website_link: row.website_link,
            status,
            category: row.category,
            milestone: row.milestone,
            image_url: row.image_url,
            position: row.position,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for business tracker operations.
pub struct BusinessRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BusinessRepository<'a> {
    /// Create a new business repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all businesses in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Business>, RepositoryError> {
        let query =
            format!("SELECT {BUSINESS_COLUMNS} FROM businesses ORDER BY position ASC, created_at ASC");
        let rows = sqlx::query_as::<_, BusinessRow>(&query)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Business::try_from).collect()
    }

    /// Get a business by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: BusinessId) -> Result<Option<Business>, RepositoryError> {
        let query = format!("SELECT {BUSINESS_COLUMNS} FROM businesses WHERE id = $1");
        let row = sqlx::query_as::<_, BusinessRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Business::try_from).transpose()
    }

    /// Create a new business.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, business: &NewBusiness) -> Result<Business, RepositoryError> {
        let query = format!(
            "INSERT INTO businesses (name, description, launch_date, website_link, status, \
             category, milestone, image_url, position, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {BUSINESS_COLUMNS}"
        );
        let row = sqlx::query_as::<_, BusinessRow>(&query)
            .bind(&business.name)
            .bind(&business.description)
            .bind(business.launch_date)
            .bind(&business.website_link)
            .bind(business.status.as_str())
            .bind(&business.category)
            .bind(&business.milestone)
            .bind(&business.image_url)
            .bind(business.position)
            .bind(business.created_by)
            .fetch_one(self.pool)
            .await?;

        row.try_into()
    }

    /// Apply a partial update to a business.
    ///
    /// Reads the current row, merges the changed fields, and writes the
    /// result back, so `Some(None)` clears an optional column.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the business does not exist.
    pub async fn update(
        &self,
        id: BusinessId,
        update: &BusinessUpdate,
    ) -> Result<Business, RepositoryError> {
        let mut current = self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)?;

        if let Some(name) = &update.name {
            current.name.clone_from(name);
        }
        if let Some(description) = &update.description {
            current.description.clone_from(description);
        }
        if let Some(launch_date) = update.launch_date {
            current.launch_date = launch_date;
        }
        if let Some(website_link) = &update.website_link {
            current.website_link.clone_from(website_link);
        }
        if let Some(status) = update.status {
            current.status = status;
        }
        if let Some(category) = &update.category {
            current.category.clone_from(category);
        }
        if let Some(milestone) = &update.milestone {
            current.milestone.clone_from(milestone);
        }
        if let Some(image_url) = &update.image_url {
            current.image_url.clone_from(image_url);
        }
        if let Some(position) = update.position {
            current.position = position;
        }

        let query = format!(
            "UPDATE businesses \
             SET name = $2, description = $3, launch_date = $4, website_link = $5, status = $6, \
                 category = $7, milestone = $8, image_url = $9, position = $10, updated_at = now() \
             WHERE id = $1 \
             RETURNING {BUSINESS_COLUMNS}"
        );
        let row = sqlx::query_as::<_, BusinessRow>(&query)
            .bind(id)
            .bind(&current.name)
            .bind(&current.description)
            .bind(current.launch_date)
            .bind(&current.website_link)
            .bind(current.status.as_str())
            .bind(&current.category)
            .bind(&current.milestone)
            .bind(&current.image_url)
            .bind(current.position)
            .fetch_one(self.pool)
            .await?;

        row.try_into()
    }

    /// Delete a business.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the business does not exist.
    pub async fn delete(&self, id: BusinessId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
